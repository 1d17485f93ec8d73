//! Wire event types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sharedrop_core::types::ShareId;

/// Discriminator of a wire event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "chat.message")]
    ChatMessage,
    #[serde(rename = "chat.delete")]
    ChatDelete,
    #[serde(rename = "favorite.toggle")]
    FavoriteToggle,
    #[serde(rename = "tag.add")]
    TagAdd,
    #[serde(rename = "tag.remove")]
    TagRemove,
    #[serde(rename = "selection.change")]
    SelectionChange,
    #[serde(rename = "user.joined")]
    UserJoined,
    #[serde(rename = "user.left")]
    UserLeft,
    #[serde(rename = "user.viewing")]
    UserViewing,
    #[serde(rename = "typing.start")]
    TypingStart,
    #[serde(rename = "typing.stop")]
    TypingStop,
    #[serde(rename = "vote.cast")]
    VoteCast,
    #[serde(rename = "sync.request")]
    SyncRequest,
    #[serde(rename = "sync.response")]
    SyncResponse,
}

impl EventType {
    /// The dotted tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatMessage => "chat.message",
            Self::ChatDelete => "chat.delete",
            Self::FavoriteToggle => "favorite.toggle",
            Self::TagAdd => "tag.add",
            Self::TagRemove => "tag.remove",
            Self::SelectionChange => "selection.change",
            Self::UserJoined => "user.joined",
            Self::UserLeft => "user.left",
            Self::UserViewing => "user.viewing",
            Self::TypingStart => "typing.start",
            Self::TypingStop => "typing.stop",
            Self::VoteCast => "vote.cast",
            Self::SyncRequest => "sync.request",
            Self::SyncResponse => "sync.response",
        }
    }

    /// Events only the server may author. Presence is derived from
    /// connection lifecycle and chat deletion requires an author check.
    pub fn is_server_only(&self) -> bool {
        matches!(self, Self::UserJoined | Self::UserLeft | Self::ChatDelete)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timestamped state-change notification relayed by the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub share_id: ShareId,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Opaque payload, interpreted only by consumers that understand the tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// The client-controlled portion of an inbound frame.
///
/// Share, user and timestamp are never read from the client; the connection
/// supplies them when the frame becomes an [`Event`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub photo_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl InboundEvent {
    /// Bind the frame to its connection, stamped with the server clock.
    pub fn into_event(self, share_id: ShareId, user: String, now: DateTime<Utc>) -> Event {
        Event {
            event_type: self.event_type,
            share_id,
            user,
            photo_id: self.photo_id,
            action: self.action,
            data: self.data,
            timestamp: now,
        }
    }
}
