//! Session service: name claims and the active-user query.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use sharedrop_core::config::SessionConfig;
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::share::ShareSession;
use sharedrop_realtime::ActiveUsers;

use crate::context::{ServiceContext, required};

/// Maximum length of a display name.
pub const MAX_USER_NAME_LEN: usize = 64;

/// Outcome of a name claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameClaim {
    /// The name now belongs to the caller.
    Claimed { user_name: String },
    /// Someone already holds the name.
    Taken {
        user_name: String,
        suggestions: [String; 2],
    },
}

/// Manages display names within a share's session.
#[derive(Debug, Clone)]
pub struct SessionService {
    ctx: ServiceContext,
    config: SessionConfig,
    /// When each released name was last handed out again.
    reclaims: Arc<DashMap<(ShareId, String), Instant>>,
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(ctx: ServiceContext, config: SessionConfig) -> Self {
        Self {
            ctx,
            config,
            reclaims: Arc::new(DashMap::new()),
        }
    }

    /// Claims a display name for the share's session.
    ///
    /// Claimed names stay claimed for the session's lifetime unless
    /// `release_names_on_leave` is set, in which case a name nobody is
    /// connected under can be taken again. A reclaimed name is then held
    /// for `reclaim_grace_seconds`, so of several concurrent reclaims only
    /// the first succeeds.
    pub async fn claim_name(&self, share_id: &ShareId, user_name: &str) -> AppResult<NameClaim> {
        let user_name = required("user_name", user_name, MAX_USER_NAME_LEN)?;
        self.ctx.require_share(share_id).await?;

        if self.ctx.store.claim_name(share_id, &user_name).await? {
            info!(share_id = %share_id, user = %user_name, "Name claimed");
            return Ok(NameClaim::Claimed { user_name });
        }

        if self.config.release_names_on_leave {
            let active = self.ctx.hub.active_users(share_id).await?;
            if !active.contains(&user_name) && self.reserve_reclaim(share_id, &user_name) {
                debug!(share_id = %share_id, user = %user_name, "Reclaiming released name");
                return Ok(NameClaim::Claimed { user_name });
            }
        }

        let suggestions = ShareSession::suggestions(&user_name);
        Ok(NameClaim::Taken {
            user_name,
            suggestions,
        })
    }

    /// Record a reclaim unless another one of the same name is still
    /// within its grace period.
    fn reserve_reclaim(&self, share_id: &ShareId, user_name: &str) -> bool {
        let key = (share_id.clone(), user_name.to_string());
        match self.reclaims.entry(key) {
            Entry::Occupied(mut held) => {
                if held.get().elapsed() < self.config.reclaim_grace() {
                    return false;
                }
                held.insert(Instant::now());
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(Instant::now());
                true
            }
        }
    }

    /// Users connected to the share right now.
    pub async fn active_users(&self, share_id: &ShareId) -> AppResult<ActiveUsers> {
        self.ctx.hub.active_users(share_id).await
    }
}
