//! Room timeline events and pagination.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::serde_utils::null_as_default;

/// Event type of ordinary chat messages.
pub const ROOM_MESSAGE_EVENT_TYPE: &str = "m.room.message";

/// One page of `/rooms/{roomId}/messages`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Events on this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub chunk: Vec<ClientEvent>,
    /// Cursor for the next page; empty when there is none.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub end: String,
    /// Cursor this page started from.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub start: String,
}

impl MessageResponse {
    /// Returns the cursor of the following page, if any.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        (!self.end.is_empty()).then_some(self.end.as_str())
    }
}

/// A timeline event as returned by the client-server API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientEvent {
    /// Room the event belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_id: String,
    /// Event id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_id: String,
    /// Event type tag.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub event_type: String,
    /// Event content. Redacted events have an empty object here.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub content: Map<String, Value>,
}

impl ClientEvent {
    /// Returns whether the event has already been redacted.
    #[must_use]
    pub fn is_redacted(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns whether this is a chat message that still has content.
    #[must_use]
    pub fn should_redact(&self) -> bool {
        self.event_type == ROOM_MESSAGE_EVENT_TYPE && !self.is_redacted()
    }
}
