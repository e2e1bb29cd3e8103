//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{MessageId, RoomId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Edit window has expired")]
    EditWindowExpired,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not the message sender")]
    NotMessageSender,

    #[error("Not a member of this room")]
    NotRoomMember,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Store error: {0}")]
    Store(String),
}

impl DomainError {
    /// Get an error code string for client-facing error events
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::RoomNotFound(_) => "UNKNOWN_ROOM",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::EditWindowExpired => "EDIT_WINDOW_EXPIRED",
            Self::NotMessageSender => "NOT_MESSAGE_SENDER",
            Self::NotRoomMember => "NOT_ROOM_MEMBER",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::RoomNotFound(_) | Self::MessageNotFound(_)
        )
    }

    /// Check if this is a validation error
    ///
    /// The expired edit window counts as validation: the request shape was
    /// fine, the content is simply no longer editable.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::ContentTooLong { .. } | Self::EditWindowExpired
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotMessageSender | Self::NotRoomMember)
    }
}
