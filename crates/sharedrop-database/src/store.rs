//! Durable store contract.

use async_trait::async_trait;

use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::{ChatMessage, PhotoSelection, Vote};
use sharedrop_entity::share::{Share, ShareSession};

/// Persistence for shares, sessions, and collaboration records.
///
/// Implementations enforce "at most one selection and one vote per
/// (share, file, user)": saving a record whose key already exists updates
/// the stored record in place and keeps its identifier.
#[async_trait]
pub trait CollabStore: Send + Sync + 'static {
    /// Persist a new share together with its session.
    async fn create_share(&self, share: &Share, session: &ShareSession) -> AppResult<()>;

    /// Look up a share.
    async fn get_share(&self, share_id: &ShareId) -> AppResult<Option<Share>>;

    /// Increment the share's access counter.
    async fn record_share_access(&self, share_id: &ShareId) -> AppResult<()>;

    /// Look up a share's session, including claimed names in claim order.
    async fn get_session(&self, share_id: &ShareId) -> AppResult<Option<ShareSession>>;

    /// Claim a display name. Returns `false` when it was already claimed.
    async fn claim_name(&self, share_id: &ShareId, user_name: &str) -> AppResult<bool>;

    /// Append a chat message.
    async fn save_chat_message(&self, message: &ChatMessage) -> AppResult<()>;

    /// Chat history of a share, oldest first.
    async fn get_chat_messages(&self, share_id: &ShareId) -> AppResult<Vec<ChatMessage>>;

    /// Find one chat message.
    async fn find_chat_message(
        &self,
        share_id: &ShareId,
        message_id: &str,
    ) -> AppResult<Option<ChatMessage>>;

    /// Delete one chat message. Returns `true` when a row was removed.
    async fn delete_chat_message(&self, share_id: &ShareId, message_id: &str) -> AppResult<bool>;

    /// Insert or update a selection; returns the stored record.
    async fn save_selection(&self, selection: &PhotoSelection) -> AppResult<PhotoSelection>;

    /// All selections of a share.
    async fn get_selections(&self, share_id: &ShareId) -> AppResult<Vec<PhotoSelection>>;

    /// Insert or update a vote; returns the stored record.
    async fn save_vote(&self, vote: &Vote) -> AppResult<Vote>;

    /// Votes of a share, optionally restricted to one file.
    async fn get_votes(&self, share_id: &ShareId, file_name: Option<&str>) -> AppResult<Vec<Vote>>;
}
