//! Presence snapshots answered by the hub.

use serde::{Deserialize, Serialize};

/// One live connection as seen by other participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveUser {
    pub name: String,
    /// File the user last reported viewing.
    pub viewing: Option<String>,
}

/// Response body of the active-user query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveUsers {
    pub users: Vec<ActiveUser>,
    pub count: usize,
}

impl ActiveUsers {
    pub fn new(users: Vec<ActiveUser>) -> Self {
        let count = users.len();
        Self { users, count }
    }

    /// Whether any live connection uses the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.users.iter().any(|u| u.name == name)
    }
}
