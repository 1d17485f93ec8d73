//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create share request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareBody {
    /// Folder to share.
    #[validate(length(min = 1, max = 4096, message = "folder_path is required"))]
    pub folder_path: String,
    /// Share password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Session display name.
    #[validate(length(max = 128))]
    pub session_name: Option<String>,
    /// Whether several people may join.
    pub allow_multiple: Option<bool>,
    /// Lifetime in hours.
    #[validate(range(min = 1, max = 8760))]
    pub expires_in_hours: Option<i64>,
}

/// Name claim request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ValidateNameBody {
    #[validate(length(min = 1, message = "share_id is required"))]
    pub share_id: String,
    #[validate(length(min = 1, max = 64, message = "user_name must be 1-64 characters"))]
    pub user_name: String,
}

/// Chat post request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostChatBody {
    #[validate(length(min = 1, message = "share_id is required"))]
    pub share_id: String,
    #[validate(length(min = 1, max = 64))]
    pub user_name: String,
    #[validate(length(min = 1, max = 2000, message = "message must be 1-2000 characters"))]
    pub message: String,
    /// File the message refers to.
    pub photo_ref: Option<String>,
}

/// Chat delete request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteChatBody {
    #[validate(length(min = 1))]
    pub share_id: String,
    #[validate(length(min = 1))]
    pub message_id: String,
    #[validate(length(min = 1, max = 64))]
    pub user_name: String,
}

/// Vote request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CastVoteBody {
    #[validate(length(min = 1))]
    pub share_id: String,
    #[validate(length(min = 1, max = 1024))]
    pub file_name: String,
    #[validate(length(min = 1, max = 64))]
    pub user_name: String,
    /// One of yes, no, maybe.
    #[validate(length(min = 1))]
    pub choice: String,
}

/// Selection request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveSelectionBody {
    #[validate(length(min = 1))]
    pub share_id: String,
    #[validate(length(min = 1, max = 1024))]
    pub file_name: String,
    #[validate(length(min = 1, max = 64))]
    pub user_name: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    #[validate(length(max = 50, message = "at most 50 tags"))]
    pub tags: Vec<String>,
}

/// `?share_id=` query.
#[derive(Debug, Clone, Deserialize)]
pub struct ShareQuery {
    pub share_id: Option<String>,
}

/// `?share_id=&file_name=` query.
#[derive(Debug, Clone, Deserialize)]
pub struct VotesQuery {
    pub share_id: Option<String>,
    pub file_name: Option<String>,
}

/// `?shareId=` query used by the presence endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveUsersQuery {
    #[serde(rename = "shareId")]
    pub share_id: Option<String>,
}

/// WebSocket connection parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct WsQuery {
    #[serde(rename = "shareId")]
    pub share_id: Option<String>,
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
}
