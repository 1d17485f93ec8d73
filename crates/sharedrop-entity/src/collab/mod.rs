//! Per-file collaboration records.
//!
//! Selections and votes are unique per (share, file, user); later writes
//! replace the earlier record in place. Chat messages are append-only.

pub mod chat;
pub mod selection;
pub mod vote;

pub use chat::ChatMessage;
pub use selection::PhotoSelection;
pub use vote::{Vote, VoteChoice, VoteSummary};

use sharedrop_core::types::ShareId;

/// Uniqueness key shared by selections and votes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    /// Owning share.
    pub share_id: ShareId,
    /// Target file name.
    pub file_name: String,
    /// Acting user.
    pub user_name: String,
}

impl RecordKey {
    /// Build a key from its parts.
    pub fn new(share_id: &ShareId, file_name: &str, user_name: &str) -> Self {
        Self {
            share_id: share_id.clone(),
            file_name: file_name.to_string(),
            user_name: user_name.to_string(),
        }
    }
}
