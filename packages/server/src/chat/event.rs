//! Typed event model for the chat wire protocol.
//!
//! Every frame on the wire is a JSON object discriminated by an `event_tag`
//! string. Outbound events are [`ChatEvent`]; the only inbound event is
//! [`InboundEvent::NewMessage`]. Nested data objects use camelCase field
//! names (`clientId`, `clientName`, `clientInfo`), while tags stay
//! snake_case.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One connected participant, identified within a room by `client_id`.
///
/// Created at connect time and immutable afterwards. Display names are not
/// required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_id: String,
    pub client_name: String,
}

/// A chat message recorded in a room's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub message: String,
    /// RFC 3339 timestamp of the moment the message was received.
    pub created: String,
    pub client_info: ClientInfo,
}

/// Outbound event broadcast over the websocket channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event_tag",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ChatEvent {
    /// Sent only to a newly connected client, carrying the full history.
    ConnectionStarted {
        client_info: ClientInfo,
        messages: Vec<ChatMessage>,
    },
    /// Reserved for rejecting a connection; part of the wire contract.
    ConnectionDenied { reason: String },
    /// Broadcast to every client in the room on a new message.
    NewMessage { message: ChatMessage },
    /// Broadcast to every client in the room when someone joins.
    UserConnected { client_info: ClientInfo },
    /// Broadcast to the remaining clients when someone leaves.
    UserDisconnected { client_info: ClientInfo },
}

impl ChatEvent {
    /// The `event_tag` discriminator this event serializes with.
    pub fn tag(&self) -> &'static str {
        match self {
            ChatEvent::ConnectionStarted { .. } => "connection_started",
            ChatEvent::ConnectionDenied { .. } => "connection_denied",
            ChatEvent::NewMessage { .. } => "new_message",
            ChatEvent::UserConnected { .. } => "user_connected",
            ChatEvent::UserDisconnected { .. } => "user_disconnected",
        }
    }
}

/// Error classifying a rejected inbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("inbound frame is missing the `event_tag` field")]
    MissingEventTag,
    #[error("unrecognized event tag '{0}'")]
    UnrecognizedEventTag(String),
    #[error("malformed '{tag}' payload: {reason}")]
    MalformedPayload { tag: String, reason: String },
}

/// Inbound event sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event_tag", rename_all = "snake_case")]
pub enum InboundEvent {
    NewMessage { message: String },
}

impl InboundEvent {
    /// Parse an inbound frame, distinguishing a missing `event_tag`, an
    /// unrecognized tag, and an otherwise malformed payload.
    pub fn from_payload(payload: &Value) -> Result<Self, EventError> {
        let Some(tag) = payload.get("event_tag").and_then(Value::as_str) else {
            return Err(EventError::MissingEventTag);
        };
        match tag {
            "new_message" => serde_json::from_value(payload.clone()).map_err(|e| {
                EventError::MalformedPayload {
                    tag: tag.to_owned(),
                    reason: e.to_string(),
                }
            }),
            other => Err(EventError::UnrecognizedEventTag(other.to_owned())),
        }
    }
}
