//! [`CollabStore`] backed by SQLite.

use async_trait::async_trait;
use sqlx::SqlitePool;

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::{ChatMessage, PhotoSelection, Vote};
use sharedrop_entity::share::{Share, ShareSession};

use crate::repositories::{
    ChatRepository, SelectionRepository, SessionRepository, ShareRepository, VoteRepository,
};
use crate::store::CollabStore;

/// SQLite store composed of one repository per table group.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    shares: ShareRepository,
    sessions: SessionRepository,
    chat: ChatRepository,
    selections: SelectionRepository,
    votes: VoteRepository,
}

impl SqliteStore {
    /// Build the store over a migrated pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            shares: ShareRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            chat: ChatRepository::new(pool.clone()),
            selections: SelectionRepository::new(pool.clone()),
            votes: VoteRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CollabStore for SqliteStore {
    async fn create_share(&self, share: &Share, session: &ShareSession) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        self.shares.insert(&mut *tx, share).await?;
        self.sessions.insert(&mut *tx, session).await?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit share", e)
        })
    }

    async fn get_share(&self, share_id: &ShareId) -> AppResult<Option<Share>> {
        self.shares.find_by_id(share_id).await
    }

    async fn record_share_access(&self, share_id: &ShareId) -> AppResult<()> {
        self.shares.increment_access(share_id).await
    }

    async fn get_session(&self, share_id: &ShareId) -> AppResult<Option<ShareSession>> {
        self.sessions.find_by_share(share_id).await
    }

    async fn claim_name(&self, share_id: &ShareId, user_name: &str) -> AppResult<bool> {
        self.sessions.claim(share_id, user_name).await
    }

    async fn save_chat_message(&self, message: &ChatMessage) -> AppResult<()> {
        self.chat.insert(message).await
    }

    async fn get_chat_messages(&self, share_id: &ShareId) -> AppResult<Vec<ChatMessage>> {
        self.chat.find_by_share(share_id).await
    }

    async fn find_chat_message(
        &self,
        share_id: &ShareId,
        message_id: &str,
    ) -> AppResult<Option<ChatMessage>> {
        self.chat.find_by_id(share_id, message_id).await
    }

    async fn delete_chat_message(&self, share_id: &ShareId, message_id: &str) -> AppResult<bool> {
        self.chat.delete(share_id, message_id).await
    }

    async fn save_selection(&self, selection: &PhotoSelection) -> AppResult<PhotoSelection> {
        self.selections.upsert(selection).await
    }

    async fn get_selections(&self, share_id: &ShareId) -> AppResult<Vec<PhotoSelection>> {
        self.selections.find_by_share(share_id).await
    }

    async fn save_vote(&self, vote: &Vote) -> AppResult<Vote> {
        self.votes.upsert(vote).await
    }

    async fn get_votes(&self, share_id: &ShareId, file_name: Option<&str>) -> AppResult<Vec<Vote>> {
        self.votes.find_by_share(share_id, file_name).await
    }
}
