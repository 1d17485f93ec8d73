//! Vote repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::Vote;

use super::share_id_column;

#[derive(Debug, sqlx::FromRow)]
struct VoteRow {
    id: String,
    share_id: String,
    file_name: String,
    user_name: String,
    choice: String,
    timestamp: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = AppError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(Vote {
            id: row.id,
            share_id: share_id_column(row.share_id)?,
            file_name: row.file_name,
            user_name: row.user_name,
            choice: row.choice.parse()?,
            timestamp: row.timestamp,
        })
    }
}

/// Repository for votes, unique per (share, file, user).
#[derive(Debug, Clone)]
pub struct VoteRepository {
    pool: SqlitePool,
}

impl VoteRepository {
    /// Create a new vote repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a vote or replace the choice of the existing one.
    pub async fn upsert(&self, vote: &Vote) -> AppResult<Vote> {
        let row = sqlx::query_as::<_, VoteRow>(
            "INSERT INTO votes (id, share_id, file_name, user_name, choice, timestamp) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT (share_id, file_name, user_name) DO UPDATE SET \
             choice = excluded.choice, timestamp = excluded.timestamp \
             RETURNING *",
        )
        .bind(&vote.id)
        .bind(vote.share_id.as_str())
        .bind(&vote.file_name)
        .bind(&vote.user_name)
        .bind(vote.choice.as_str())
        .bind(vote.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save vote", e))?;
        Vote::try_from(row)
    }

    /// Votes of a share, optionally for a single file.
    pub async fn find_by_share(
        &self,
        share_id: &ShareId,
        file_name: Option<&str>,
    ) -> AppResult<Vec<Vote>> {
        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT * FROM votes WHERE share_id = ? AND (? IS NULL OR file_name = ?) \
             ORDER BY timestamp, rowid",
        )
        .bind(share_id.as_str())
        .bind(file_name)
        .bind(file_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list votes", e))?;
        rows.into_iter().map(Vote::try_from).collect()
    }
}
