//! Transport-neutral WebSocket frames.
//!
//! The adapter reads and writes these so it can run over any duplex
//! transport; the HTTP layer converts them to and from its socket type.

/// Close code for a normal closure.
pub const CLOSE_NORMAL: u16 = 1000;

/// Close code for an endpoint going away (page navigation, server stop).
pub const CLOSE_GOING_AWAY: u16 = 1001;

/// One frame on a duplex connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    /// Raw payload from a binary message; read as UTF-8 JSON like text.
    Binary(Vec<u8>),
    Ping,
    Pong,
    /// Close with an optional status code.
    Close(Option<u16>),
}

impl Frame {
    /// Whether a close code denotes an orderly shutdown rather than an error.
    pub fn is_normal_close(code: Option<u16>) -> bool {
        matches!(code, None | Some(CLOSE_NORMAL) | Some(CLOSE_GOING_AWAY))
    }
}
