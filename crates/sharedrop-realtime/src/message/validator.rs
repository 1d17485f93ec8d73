//! Inbound event validation rules.

use super::codec::CodecError;
use super::types::InboundEvent;

/// Maximum length of a file reference carried by a client event.
const MAX_PHOTO_ID_LEN: usize = 1024;

/// Maximum length of an action verb.
const MAX_ACTION_LEN: usize = 64;

/// Validates a decoded client event.
pub fn validate_inbound(event: &InboundEvent) -> Result<(), CodecError> {
    if event.event_type.is_server_only() {
        return Err(CodecError::Rejected(format!(
            "'{}' events are server-originated",
            event.event_type
        )));
    }

    if exceeds(event.photo_id.as_deref(), MAX_PHOTO_ID_LEN) {
        return Err(CodecError::Rejected("photoId too long".into()));
    }

    if exceeds(event.action.as_deref(), MAX_ACTION_LEN) {
        return Err(CodecError::Rejected("action too long".into()));
    }

    Ok(())
}

fn exceeds(field: Option<&str>, max: usize) -> bool {
    field.is_some_and(|value| value.len() > max)
}
