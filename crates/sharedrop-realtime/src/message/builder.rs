//! Builder helpers for server-originated events.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use sharedrop_core::types::ShareId;
use sharedrop_entity::collab::{ChatMessage, PhotoSelection, Vote};

use super::types::{Event, EventType};

/// Build a bare server-originated event stamped with the current time.
pub fn build_event(event_type: EventType, share_id: &ShareId, user: &str) -> Event {
    Event {
        event_type,
        share_id: share_id.clone(),
        user: user.to_string(),
        photo_id: None,
        action: None,
        data: None,
        timestamp: Utc::now(),
    }
}

fn with_record<T: Serialize>(mut event: Event, record: &T) -> Event {
    match serde_json::to_value(record) {
        Ok(value) => event.data = Some(value),
        Err(e) => tracing::warn!(
            event_type = %event.event_type,
            error = %e,
            "Failed to attach event payload"
        ),
    }
    event
}

/// Build a presence join event
pub fn build_user_joined(share_id: &ShareId, user: &str) -> Event {
    build_event(EventType::UserJoined, share_id, user)
}

/// Build a presence leave event
pub fn build_user_left(share_id: &ShareId, user: &str) -> Event {
    build_event(EventType::UserLeft, share_id, user)
}

/// Build a `chat.message` event carrying the stored message
pub fn build_chat_message(message: &ChatMessage) -> Event {
    let mut event = build_event(
        EventType::ChatMessage,
        &message.share_id,
        &message.user_name,
    );
    event.photo_id = message.photo_ref.clone();
    with_record(event, message)
}

/// Build a `chat.delete` event
pub fn build_chat_delete(share_id: &ShareId, user: &str, message_id: &str) -> Event {
    let mut event = build_event(EventType::ChatDelete, share_id, user);
    event.data = Some(json!({ "id": message_id }));
    event
}

/// Build a `vote.cast` event carrying the stored vote
pub fn build_vote_cast(vote: &Vote) -> Event {
    let mut event = build_event(EventType::VoteCast, &vote.share_id, &vote.user_name);
    event.photo_id = Some(vote.file_name.clone());
    event.action = Some(vote.choice.as_str().to_string());
    with_record(event, vote)
}

/// Build a `selection.change` event carrying the stored selection
pub fn build_selection_change(selection: &PhotoSelection) -> Event {
    let mut event = build_event(
        EventType::SelectionChange,
        &selection.share_id,
        &selection.user_name,
    );
    event.photo_id = Some(selection.file_name.clone());
    with_record(event, selection)
}
