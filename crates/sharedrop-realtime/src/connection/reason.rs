//! Why a connection ended.

use thiserror::Error;

use super::frame::Frame;

/// Terminal cause of a connection. Drives log level only; never sent to
/// the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectReason {
    #[error("normal closure")]
    NormalClosure,
    #[error("peer closed with code {0}")]
    PeerClosed(u16),
    #[error("transport stream ended")]
    StreamEnded,
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("no pong within the read deadline")]
    ReadDeadline,
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("write deadline exceeded")]
    WriteDeadline,
    /// The hub closed the outbound queue (unregistered or evicted).
    #[error("outbound queue closed")]
    QueueClosed,
    #[error("hub unavailable")]
    Shutdown,
    /// The other half of the connection ended first.
    #[error("cancelled")]
    Cancelled,
}

impl DisconnectReason {
    /// Map a received close frame's code.
    pub fn from_close(code: Option<u16>) -> Self {
        match code {
            Some(c) if !Frame::is_normal_close(code) => Self::PeerClosed(c),
            _ => Self::NormalClosure,
        }
    }

    /// Whether this ending should be logged as a transport problem.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::PeerClosed(_)
                | Self::ReadFailed(_)
                | Self::ReadDeadline
                | Self::WriteFailed(_)
                | Self::WriteDeadline
        )
    }
}
