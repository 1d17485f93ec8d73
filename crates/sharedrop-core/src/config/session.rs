//! Share session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Share session (display-name claim) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// When `true`, a claimed display name becomes available again once no
    /// live connection uses it. When `false` (default) a name stays claimed
    /// for the lifetime of the share.
    #[serde(default)]
    pub release_names_on_leave: bool,
    /// After a released name is handed out again, further claims of it are
    /// refused for this many seconds so the new holder can connect.
    #[serde(default = "default_reclaim_grace")]
    pub reclaim_grace_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            release_names_on_leave: false,
            reclaim_grace_seconds: default_reclaim_grace(),
        }
    }
}

impl SessionConfig {
    /// How long a reclaimed name is reserved for its new holder.
    pub fn reclaim_grace(&self) -> Duration {
        Duration::from_secs(self.reclaim_grace_seconds)
    }
}

fn default_reclaim_grace() -> u64 {
    30
}
