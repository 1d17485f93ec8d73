//! Chat message record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharedrop_core::types::ShareId;

/// One chat line posted in a share session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Record identifier.
    pub id: String,
    /// Owning share.
    pub share_id: ShareId,
    /// Author's claimed display name.
    pub user_name: String,
    /// Message body.
    pub message: String,
    /// File the message refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
    /// When the message was posted.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time.
    pub fn new(
        share_id: ShareId,
        user_name: impl Into<String>,
        message: impl Into<String>,
        photo_ref: Option<String>,
    ) -> Self {
        Self {
            id: crate::new_record_id(),
            share_id,
            user_name: user_name.into(),
            message: message.into(),
            photo_ref,
            timestamp: Utc::now(),
        }
    }
}
