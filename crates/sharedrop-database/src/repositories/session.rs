//! Share session and claimed-name repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::share::ShareSession;

use super::share_id_column;

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    share_id: String,
    session_name: String,
    allow_multiple: bool,
    created_at: DateTime<Utc>,
}

/// Repository for share sessions and the names claimed in them.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a session and any pre-claimed names inside an open transaction.
    pub async fn insert(
        &self,
        tx: &mut sqlx::SqliteConnection,
        session: &ShareSession,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO share_sessions (share_id, session_name, allow_multiple, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(session.share_id.as_str())
        .bind(&session.session_name)
        .bind(session.allow_multiple)
        .bind(session.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))?;

        for name in &session.claimed_names {
            sqlx::query(
                "INSERT OR IGNORE INTO claimed_names (share_id, user_name, claimed_at) \
                 VALUES (?, ?, ?)",
            )
            .bind(session.share_id.as_str())
            .bind(name)
            .bind(session.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim name", e))?;
        }
        Ok(())
    }

    /// Find a session with its claimed names in claim order.
    pub async fn find_by_share(&self, share_id: &ShareId) -> AppResult<Option<ShareSession>> {
        let row = sqlx::query_as::<_, SessionRow>("SELECT * FROM share_sessions WHERE share_id = ?")
            .bind(share_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let claimed_names: Vec<String> = sqlx::query_scalar(
            "SELECT user_name FROM claimed_names WHERE share_id = ? ORDER BY claimed_at, rowid",
        )
        .bind(share_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list claimed names", e)
        })?;

        Ok(Some(ShareSession {
            share_id: share_id_column(row.share_id)?,
            session_name: row.session_name,
            allow_multiple: row.allow_multiple,
            claimed_names,
            created_at: row.created_at,
        }))
    }

    /// Claim a name; `false` when it is already taken.
    pub async fn claim(&self, share_id: &ShareId, user_name: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO claimed_names (share_id, user_name, claimed_at) \
             VALUES (?, ?, ?)",
        )
        .bind(share_id.as_str())
        .bind(user_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim name", e))?;
        Ok(result.rows_affected() == 1)
    }
}
