//! JSON framing for wire events.

use std::sync::Arc;

use thiserror::Error;

use super::types::{Event, InboundEvent};
use super::validator::validate_inbound;

/// Why an inbound frame could not become an event.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The frame exceeds the configured size limit.
    #[error("frame of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    /// A binary frame whose payload is not UTF-8.
    #[error("frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// The frame is not a well-formed event.
    #[error("malformed event: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The event decoded but is not acceptable from a client.
    #[error("rejected event: {0}")]
    Rejected(String),
}

/// Decode and validate one inbound text frame.
pub fn decode_inbound(text: &str, max_size: usize) -> Result<InboundEvent, CodecError> {
    if text.len() > max_size {
        return Err(CodecError::TooLarge {
            size: text.len(),
            limit: max_size,
        });
    }
    let event: InboundEvent = serde_json::from_str(text)?;
    validate_inbound(&event)?;
    Ok(event)
}

/// Decode a binary frame, which must carry the same UTF-8 JSON as a text one.
pub fn decode_inbound_bytes(bytes: &[u8], max_size: usize) -> Result<InboundEvent, CodecError> {
    if bytes.len() > max_size {
        return Err(CodecError::TooLarge {
            size: bytes.len(),
            limit: max_size,
        });
    }
    decode_inbound(std::str::from_utf8(bytes)?, max_size)
}

/// Serialize an event once so every recipient shares the same buffer.
pub fn encode(event: &Event) -> Result<Arc<str>, CodecError> {
    Ok(Arc::from(serde_json::to_string(event)?))
}

/// Split a text frame that may carry several newline-joined events.
pub fn split_batch(frame: &str) -> impl Iterator<Item = &str> {
    frame
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

/// Decode every event of a received (possibly batched) frame.
pub fn decode_batch(frame: &str) -> Vec<Result<Event, CodecError>> {
    split_batch(frame)
        .map(|line| serde_json::from_str::<Event>(line).map_err(CodecError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::types::EventType;

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let err = decode_inbound(r#"{"type":"photo.delete"}"#, 1024).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let text = format!(r#"{{"type":"typing.start","data":"{}"}}"#, "x".repeat(100));
        let err = decode_inbound(&text, 32).unwrap_err();
        assert!(matches!(err, CodecError::TooLarge { limit: 32, .. }));
    }

    #[test]
    fn test_decode_bytes_requires_utf8() {
        let err = decode_inbound_bytes(&[b'{', 0xff, 0xfe, b'}'], 1024).unwrap_err();
        assert!(matches!(err, CodecError::InvalidUtf8(_)));

        let event = decode_inbound_bytes(br#"{"type":"typing.stop"}"#, 1024).unwrap();
        assert_eq!(event.event_type, EventType::TypingStop);
    }

    #[test]
    fn test_decode_rejects_server_only() {
        let err = decode_inbound(r#"{"type":"user.left"}"#, 1024).unwrap_err();
        assert!(matches!(err, CodecError::Rejected(_)));
    }

    #[test]
    fn test_decode_typing() {
        let event = decode_inbound(r#"{"type":"typing.start","photoId":"a.jpg"}"#, 1024).unwrap();
        assert_eq!(event.event_type, EventType::TypingStart);
        assert_eq!(event.photo_id.as_deref(), Some("a.jpg"));
    }

    #[test]
    fn test_split_batch_skips_blank_lines() {
        let lines: Vec<&str> = split_batch("{\"a\":1}\n\n{\"b\":2}\n").collect();
        assert_eq!(lines, vec!["{\"a\":1}", "{\"b\":2}"]);
    }
}
