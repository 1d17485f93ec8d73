//! Share repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::share::Share;

use super::share_id_column;

#[derive(Debug, sqlx::FromRow)]
struct ShareRow {
    id: String,
    folder_path: String,
    password: String,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    access_count: i64,
}

impl TryFrom<ShareRow> for Share {
    type Error = AppError;

    fn try_from(row: ShareRow) -> Result<Self, Self::Error> {
        Ok(Share {
            id: share_id_column(row.id)?,
            folder_path: row.folder_path,
            password: row.password,
            expires_at: row.expires_at,
            created_at: row.created_at,
            access_count: row.access_count,
        })
    }
}

/// Repository for share rows.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: SqlitePool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a share by ID.
    pub async fn find_by_id(&self, id: &ShareId) -> AppResult<Option<Share>> {
        let row = sqlx::query_as::<_, ShareRow>("SELECT * FROM shares WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))?;
        row.map(Share::try_from).transpose()
    }

    /// Insert a share inside an open transaction.
    pub async fn insert(
        &self,
        tx: &mut sqlx::SqliteConnection,
        share: &Share,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO shares (id, folder_path, password, expires_at, created_at, access_count) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(share.id.as_str())
        .bind(&share.folder_path)
        .bind(&share.password)
        .bind(share.expires_at)
        .bind(share.created_at)
        .bind(share.access_count)
        .execute(tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict(format!("Share '{}' already exists", share.id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create share", e),
        })?;
        Ok(())
    }

    /// Increment the access counter.
    pub async fn increment_access(&self, id: &ShareId) -> AppResult<()> {
        sqlx::query(
            "UPDATE shares SET access_count = access_count + 1 WHERE id = ?",
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record share access", e)
        })?;
        Ok(())
    }
}
