//! Photo selection repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use sharedrop_core::error::{AppError, ErrorKind};
use sharedrop_core::result::AppResult;
use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::PhotoSelection;

use super::share_id_column;

#[derive(Debug, sqlx::FromRow)]
struct SelectionRow {
    id: String,
    share_id: String,
    file_name: String,
    user_name: String,
    is_favorite: bool,
    tags: sqlx::types::Json<Vec<String>>,
    timestamp: DateTime<Utc>,
}

impl TryFrom<SelectionRow> for PhotoSelection {
    type Error = AppError;

    fn try_from(row: SelectionRow) -> Result<Self, Self::Error> {
        Ok(PhotoSelection {
            id: row.id,
            share_id: share_id_column(row.share_id)?,
            file_name: row.file_name,
            user_name: row.user_name,
            is_favorite: row.is_favorite,
            tags: row.tags.0,
            timestamp: row.timestamp,
        })
    }
}

/// Repository for photo selections, unique per (share, file, user).
#[derive(Debug, Clone)]
pub struct SelectionRepository {
    pool: SqlitePool,
}

impl SelectionRepository {
    /// Create a new selection repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a selection or update the existing one for the same key.
    pub async fn upsert(&self, selection: &PhotoSelection) -> AppResult<PhotoSelection> {
        let row = sqlx::query_as::<_, SelectionRow>(
            "INSERT INTO selections \
             (id, share_id, file_name, user_name, is_favorite, tags, timestamp) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT (share_id, file_name, user_name) DO UPDATE SET \
             is_favorite = excluded.is_favorite, tags = excluded.tags, \
             timestamp = excluded.timestamp \
             RETURNING *",
        )
        .bind(&selection.id)
        .bind(selection.share_id.as_str())
        .bind(&selection.file_name)
        .bind(&selection.user_name)
        .bind(selection.is_favorite)
        .bind(sqlx::types::Json(&selection.tags))
        .bind(selection.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save selection", e))?;
        PhotoSelection::try_from(row)
    }

    /// All selections of a share.
    pub async fn find_by_share(&self, share_id: &ShareId) -> AppResult<Vec<PhotoSelection>> {
        let rows = sqlx::query_as::<_, SelectionRow>(
            "SELECT * FROM selections WHERE share_id = ? ORDER BY file_name, user_name",
        )
        .bind(share_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list selections", e))?;
        rows.into_iter().map(PhotoSelection::try_from).collect()
    }
}
