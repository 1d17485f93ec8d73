//! Per-share collaborative session metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharedrop_core::types::ShareId;

/// Collaborative metadata attached one-to-one to a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareSession {
    /// Owning share.
    pub share_id: ShareId,
    /// Display name of the session.
    pub session_name: String,
    /// Whether more than one person may join.
    pub allow_multiple: bool,
    /// Claimed display names, in claim order. Append-only.
    pub claimed_names: Vec<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl ShareSession {
    /// Create an empty session for a share.
    pub fn new(share_id: ShareId, session_name: impl Into<String>, allow_multiple: bool) -> Self {
        Self {
            share_id,
            session_name: session_name.into(),
            allow_multiple,
            claimed_names: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether `name` has already been claimed.
    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed_names.iter().any(|n| n == name)
    }

    /// Record a claim. Returns `false` if the name was already taken.
    pub fn claim(&mut self, name: &str) -> bool {
        if self.is_claimed(name) {
            return false;
        }
        self.claimed_names.push(name.to_string());
        true
    }

    /// Alternatives offered when `name` is taken.
    pub fn suggestions(name: &str) -> [String; 2] {
        [format!("{name}2"), format!("{name}_B")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_append_only() {
        let mut session = ShareSession::new(ShareId::parse("abc123").unwrap(), "Wedding", true);
        assert!(session.claim("alice"));
        assert!(session.claim("bob"));
        assert!(!session.claim("alice"));
        assert_eq!(session.claimed_names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(
            ShareSession::suggestions("ana"),
            ["ana2".to_string(), "ana_B".to_string()]
        );
    }
}
