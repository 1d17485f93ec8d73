//! Selection (favorite and tags) service.

use std::collections::BTreeMap;

use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::PhotoSelection;
use sharedrop_realtime::message::builder::build_selection_change;
use sharedrop_realtime::query::{FavoriteCount, favorite_counts};

use super::{file_name, user_name};
use crate::context::ServiceContext;

/// Saves selections and answers favorite-count queries.
#[derive(Debug, Clone)]
pub struct SelectionService {
    ctx: ServiceContext,
}

impl SelectionService {
    /// Creates a new selection service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Stores the caller's favorite flag and tags for a file and broadcasts
    /// `selection.change`.
    pub async fn save_selection(
        &self,
        share_id: &ShareId,
        file: &str,
        user: &str,
        is_favorite: bool,
        tags: Vec<String>,
    ) -> AppResult<PhotoSelection> {
        let file = file_name(file)?;
        let user = user_name(user)?;
        self.ctx.require_share(share_id).await?;

        let selection = PhotoSelection::new(share_id.clone(), file, user, is_favorite, tags);
        let stored = self.ctx.store.save_selection(&selection).await?;
        self.ctx.publish(build_selection_change(&stored)).await;
        Ok(stored)
    }

    pub async fn list_selections(&self, share_id: &ShareId) -> AppResult<Vec<PhotoSelection>> {
        self.ctx.require_share(share_id).await?;
        self.ctx.store.get_selections(share_id).await
    }

    /// Per-file favorite counts, recomputed from one read of the records.
    pub async fn favorite_counts(
        &self,
        share_id: &ShareId,
    ) -> AppResult<BTreeMap<String, FavoriteCount>> {
        let selections = self.list_selections(share_id).await?;
        Ok(favorite_counts(&selections))
    }
}
