//! Dependencies shared by every service.

use std::sync::Arc;

use tracing::warn;

use sharedrop_core::error::AppError;
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_database::CollabStore;
use sharedrop_entity::share::Share;
use sharedrop_realtime::{Event, HubHandle};

/// Store and hub, cloned into each service.
#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<dyn CollabStore>,
    pub hub: HubHandle,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("hub", &self.hub)
            .finish()
    }
}

impl ServiceContext {
    pub fn new(store: Arc<dyn CollabStore>, hub: HubHandle) -> Self {
        Self { store, hub }
    }

    /// Load a share that exists and has not expired.
    pub async fn require_share(&self, share_id: &ShareId) -> AppResult<Share> {
        let share = self
            .store
            .get_share(share_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Share '{share_id}' not found")))?;

        if share.is_expired() {
            return Err(AppError::forbidden(format!(
                "Share '{share_id}' has expired"
            )));
        }
        Ok(share)
    }

    /// Hand a committed change to the hub.
    ///
    /// A hub failure does not undo the write, so it is logged rather than
    /// returned.
    pub async fn publish(&self, event: Event) {
        let event_type = event.event_type;
        let share_id = event.share_id.clone();
        if let Err(e) = self.hub.broadcast(event).await {
            warn!(
                share_id = %share_id,
                event_type = %event_type,
                error = %e,
                "Failed to broadcast event"
            );
        }
    }
}

/// Trim a required text field, rejecting blanks and overlong values.
pub(crate) fn required(field: &str, value: &str, max_len: usize) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use sharedrop_core::config::RealtimeConfig;
    use sharedrop_database::MemoryStore;
    use sharedrop_entity::share::ShareSession;
    use sharedrop_realtime::RealtimeEngine;

    use super::*;

    pub async fn context() -> (ServiceContext, RealtimeEngine) {
        let engine = RealtimeEngine::start(&RealtimeConfig {
            announce_presence: false,
            ..RealtimeConfig::default()
        });
        let ctx = ServiceContext::new(Arc::new(MemoryStore::new()), engine.hub.clone());
        (ctx, engine)
    }

    pub async fn seeded() -> (ServiceContext, RealtimeEngine, ShareId) {
        let (ctx, engine) = context().await;
        let share = Share::new("/photos/wedding", "pw", None).unwrap();
        let session = ShareSession::new(share.id.clone(), "Wedding", true);
        ctx.store.create_share(&share, &session).await.unwrap();
        (ctx, engine, share.id)
    }
}
