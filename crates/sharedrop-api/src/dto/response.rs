//! Response DTOs.

use serde::{Deserialize, Serialize};

use sharedrop_entity::share::{Share, ShareSession};
use sharedrop_realtime::metrics::MetricsSnapshot;

/// A share together with its session.
#[derive(Debug, Clone, Serialize)]
pub struct ShareResponse {
    pub share: Share,
    pub session: ShareSession,
}

/// Result of a name claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameClaimResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Acknowledgement for actions without a record to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Application version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
    /// Whether the hub loop is accepting commands.
    pub hub_running: bool,
    /// Realtime counters.
    pub realtime: MetricsSnapshot,
}
