//! Outbound event envelope
//!
//! Uses the same `{ "event": ..., "data": ... }` envelope as the inbound
//! protocol. `ServerEvent` is `Clone` so the fan-out engine can deliver
//! one event to many connections.

use chrono::{DateTime, Utc};
use relay_core::{DirectMessage, Message, MessageId, PresenceStatus, Reaction, RoomId, UserId};
use serde::{Deserialize, Serialize};

/// A message sent by the gateway over the WebSocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message was posted to a room the connection subscribes to
    NewMessage { message: Message },

    /// Delivery acknowledgement to the sender of a room message
    MessageDelivered {
        message_id: MessageId,
        room_id: RoomId,
    },

    /// A direct message arrived for this user
    NewDm { message: DirectMessage },

    /// Acknowledgement to the sender of a direct message
    DmSent { message: DirectMessage },

    /// A room message was edited
    MessageEdited {
        message_id: MessageId,
        room_id: RoomId,
        content: String,
        edited_at: DateTime<Utc>,
    },

    /// A room message was deleted
    MessageDeleted {
        message_id: MessageId,
        room_id: RoomId,
    },

    /// A reaction was toggled; carries the message's full reaction list
    ReactionAdded {
        message_id: MessageId,
        room_id: RoomId,
        reactions: Vec<Reaction>,
    },

    /// A user marked a message as read
    MessageRead {
        message_id: MessageId,
        room_id: RoomId,
        user_id: UserId,
    },

    /// A user started typing in a room
    UserTyping {
        room_id: RoomId,
        user_id: UserId,
        username: String,
    },

    /// A user stopped typing in a room
    UserStoppedTyping { room_id: RoomId, user_id: UserId },

    /// A user joined a room
    UserJoined {
        room_id: RoomId,
        user_id: UserId,
        username: String,
    },

    /// A user left a room
    UserLeft {
        room_id: RoomId,
        user_id: UserId,
        username: String,
    },

    /// A user's first connection came online
    UserOnline { user_id: UserId, username: String },

    /// A user's last connection went away
    UserOffline {
        user_id: UserId,
        last_seen: DateTime<Utc>,
    },

    /// A user changed their presence status
    UserStatusChanged {
        user_id: UserId,
        status: PresenceStatus,
    },

    /// A handler rejected the originating connection's event
    Error { code: String, message: String },
}

impl ServerEvent {
    /// Serialize for the wire
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Event name as it appears on the wire (for logging)
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage { .. } => "new_message",
            Self::MessageDelivered { .. } => "message_delivered",
            Self::NewDm { .. } => "new_dm",
            Self::DmSent { .. } => "dm_sent",
            Self::MessageEdited { .. } => "message_edited",
            Self::MessageDeleted { .. } => "message_deleted",
            Self::ReactionAdded { .. } => "reaction_added",
            Self::MessageRead { .. } => "message_read",
            Self::UserTyping { .. } => "user_typing",
            Self::UserStoppedTyping { .. } => "user_stopped_typing",
            Self::UserJoined { .. } => "user_joined",
            Self::UserLeft { .. } => "user_left",
            Self::UserOnline { .. } => "user_online",
            Self::UserOffline { .. } => "user_offline",
            Self::UserStatusChanged { .. } => "user_status_changed",
            Self::Error { .. } => "error",
        }
    }
}
