//! Inbound event envelope
//!
//! Every client frame is a JSON envelope:
//!
//! ```json
//! { "event": "send_message", "data": { "room_id": "...", "content": "hi" } }
//! ```
//!
//! Inbound events form one exhaustive enum dispatched through a single
//! entry point, so an unknown event name is a deserialization error and
//! handled in one place rather than silently ignored.

use relay_core::{MessageId, MessageKind, PresenceStatus, RoomId, UserId};
use serde::{Deserialize, Serialize};

/// A message sent by the client over the WebSocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Subscribe this connection to a room's live traffic
    JoinRoom { room_id: RoomId },

    /// Unsubscribe and drop persisted membership
    LeaveRoom { room_id: RoomId },

    /// Post a message to a room
    SendMessage {
        room_id: RoomId,
        content: String,
        #[serde(default)]
        kind: MessageKind,
        #[serde(default)]
        file_url: Option<String>,
        #[serde(default)]
        reply_to: Option<MessageId>,
    },

    /// Send a direct message to another user
    SendDm {
        recipient_id: UserId,
        content: String,
        #[serde(default)]
        kind: MessageKind,
        #[serde(default)]
        file_url: Option<String>,
    },

    /// Edit a previously sent message (sender only, 5-minute window)
    EditMessage {
        message_id: MessageId,
        room_id: RoomId,
        content: String,
    },

    /// Delete a previously sent message (sender only)
    DeleteMessage {
        message_id: MessageId,
        room_id: RoomId,
    },

    /// Toggle an emoji reaction on a message
    AddReaction {
        message_id: MessageId,
        room_id: RoomId,
        emoji: String,
    },

    /// Mark a message as read by this user
    MessageRead {
        message_id: MessageId,
        room_id: RoomId,
    },

    /// Start a typing indicator in a room
    TypingStart { room_id: RoomId },

    /// Stop a typing indicator in a room
    TypingStop { room_id: RoomId },

    /// Change this user's presence status
    UserStatus { status: PresenceStatus },
}

impl ClientEvent {
    /// Parse an inbound text frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Event name as it appears on the wire (for logging)
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom { .. } => "leave_room",
            Self::SendMessage { .. } => "send_message",
            Self::SendDm { .. } => "send_dm",
            Self::EditMessage { .. } => "edit_message",
            Self::DeleteMessage { .. } => "delete_message",
            Self::AddReaction { .. } => "add_reaction",
            Self::MessageRead { .. } => "message_read",
            Self::TypingStart { .. } => "typing_start",
            Self::TypingStop { .. } => "typing_stop",
            Self::UserStatus { .. } => "user_status",
        }
    }
}
