//! Real-time hub and connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const SOCKET_FRAME_LIMIT_FACTOR: usize = 4;

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of each connection's outbound queue. A full queue at
    /// broadcast time evicts the connection.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue_size: usize,
    /// Capacity of the hub's command queue.
    #[serde(default = "default_hub_queue")]
    pub hub_queue_size: usize,
    /// Inbound read deadline in seconds, refreshed on every pong.
    #[serde(default = "default_pong_wait")]
    pub pong_wait_seconds: u64,
    /// Interval between server pings in seconds. Must be below the pong wait.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Absolute deadline for every outbound write, in seconds.
    #[serde(default = "default_write_wait")]
    pub write_wait_seconds: u64,
    /// Largest inbound event accepted, in bytes. Larger frames are dropped
    /// and the connection stays open.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Emit `user.joined` / `user.left` when connections come and go.
    #[serde(default = "default_true")]
    pub announce_presence: bool,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_queue_size: default_outbound_queue(),
            hub_queue_size: default_hub_queue(),
            pong_wait_seconds: default_pong_wait(),
            ping_interval_seconds: default_ping_interval(),
            write_wait_seconds: default_write_wait(),
            max_message_size: default_max_message_size(),
            announce_presence: true,
        }
    }
}

impl RealtimeConfig {
    /// Reject settings that would make the heartbeat or fan-out misbehave.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.outbound_queue_size == 0 || self.hub_queue_size == 0 {
            return Err(AppError::configuration(
                "realtime queue sizes must be at least 1",
            ));
        }
        if self.ping_interval_seconds == 0
            || self.ping_interval_seconds >= self.pong_wait_seconds
        {
            return Err(AppError::configuration(format!(
                "realtime.ping_interval_seconds ({}) must be positive and below \
                 pong_wait_seconds ({})",
                self.ping_interval_seconds, self.pong_wait_seconds
            )));
        }
        if self.write_wait_seconds == 0 {
            return Err(AppError::configuration(
                "realtime.write_wait_seconds must be positive",
            ));
        }
        Ok(())
    }

    /// Inbound read deadline.
    pub fn pong_wait(&self) -> Duration {
        Duration::from_secs(self.pong_wait_seconds)
    }

    /// Heartbeat period.
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_seconds)
    }

    /// Hard ceiling for a single socket message, a multiple of
    /// `max_message_size`. Messages above it fail the transport read.
    pub fn socket_frame_limit(&self) -> usize {
        self.max_message_size
            .saturating_mul(SOCKET_FRAME_LIMIT_FACTOR)
    }

    /// Per-write deadline.
    pub fn write_wait(&self) -> Duration {
        Duration::from_secs(self.write_wait_seconds)
    }
}

fn default_outbound_queue() -> usize {
    256
}

fn default_hub_queue() -> usize {
    1024
}

fn default_pong_wait() -> u64 {
    60
}

// 9/10 of the pong wait so a ping always lands before the deadline.
fn default_ping_interval() -> u64 {
    54
}

fn default_write_wait() -> u64 {
    10
}

fn default_max_message_size() -> usize {
    65_536
}

fn default_true() -> bool {
    true
}
