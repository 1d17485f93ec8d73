//! Chat message repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::ChatMessage;

use super::share_id_column;

#[derive(Debug, sqlx::FromRow)]
struct ChatRow {
    id: String,
    share_id: String,
    user_name: String,
    message: String,
    photo_ref: Option<String>,
    timestamp: DateTime<Utc>,
}

impl TryFrom<ChatRow> for ChatMessage {
    type Error = AppError;

    fn try_from(row: ChatRow) -> Result<Self, Self::Error> {
        Ok(ChatMessage {
            id: row.id,
            share_id: share_id_column(row.share_id)?,
            user_name: row.user_name,
            message: row.message,
            photo_ref: row.photo_ref,
            timestamp: row.timestamp,
        })
    }
}

/// Repository for chat messages.
#[derive(Debug, Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    /// Create a new chat repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a message.
    pub async fn insert(&self, message: &ChatMessage) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO chat_messages (id, share_id, user_name, message, photo_ref, timestamp) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(message.share_id.as_str())
        .bind(&message.user_name)
        .bind(&message.message)
        .bind(&message.photo_ref)
        .bind(message.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save chat message", e))?;
        Ok(())
    }

    /// Messages for a share, oldest first.
    pub async fn find_by_share(&self, share_id: &ShareId) -> AppResult<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, ChatRow>(
            "SELECT * FROM chat_messages WHERE share_id = ? ORDER BY timestamp, rowid",
        )
        .bind(share_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list chat messages", e)
        })?;
        rows.into_iter().map(ChatMessage::try_from).collect()
    }

    /// Find a message by ID within a share.
    pub async fn find_by_id(&self, share_id: &ShareId, id: &str) -> AppResult<Option<ChatMessage>> {
        let row = sqlx::query_as::<_, ChatRow>(
            "SELECT * FROM chat_messages WHERE share_id = ? AND id = ?",
        )
        .bind(share_id.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find chat message", e))?;
        row.map(ChatMessage::try_from).transpose()
    }

    /// Delete a message by ID within a share.
    pub async fn delete(&self, share_id: &ShareId, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE share_id = ? AND id = ?")
            .bind(share_id.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete chat message", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
