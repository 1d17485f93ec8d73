//! Favorite flag and tag set a user attaches to a file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharedrop_core::types::ShareId;

use super::RecordKey;

/// A user's selection state for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoSelection {
    /// Record identifier.
    pub id: String,
    /// Owning share.
    pub share_id: ShareId,
    /// Target file name.
    pub file_name: String,
    /// Acting user.
    pub user_name: String,
    /// Whether the user marked the file as a favorite.
    pub is_favorite: bool,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Time of the last update.
    pub timestamp: DateTime<Utc>,
}

impl PhotoSelection {
    /// Create a selection stamped with the current time.
    pub fn new(
        share_id: ShareId,
        file_name: impl Into<String>,
        user_name: impl Into<String>,
        is_favorite: bool,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: crate::new_record_id(),
            share_id,
            file_name: file_name.into(),
            user_name: user_name.into(),
            is_favorite,
            tags: normalize_tags(tags),
            timestamp: Utc::now(),
        }
    }

    /// Uniqueness key of this record.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.share_id, &self.file_name, &self.user_name)
    }
}

/// Trim, drop empties, and de-duplicate tags while keeping first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
