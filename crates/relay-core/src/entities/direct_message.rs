//! Direct message entity - a message in a one-to-one conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::MessageKind;
use crate::value_objects::{MessageId, UserId};

/// A message scoped to exactly two participants.
///
/// A conversation is identified by the *unordered* participant pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: MessageId,
    pub participants: [UserId; 2],
    pub sender_id: UserId,
    pub content: String,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default)]
    pub read_by: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl DirectMessage {
    /// Create a new direct message from `sender_id` to `recipient_id`
    pub fn new(
        id: MessageId,
        sender_id: UserId,
        recipient_id: UserId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            participants: [sender_id, recipient_id],
            sender_id,
            content: content.into(),
            kind: MessageKind::Text,
            file_url: None,
            read_by: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Set the message kind
    #[must_use]
    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attach a file URL
    #[must_use]
    pub fn with_file_url(mut self, url: impl Into<String>) -> Self {
        self.file_url = Some(url.into());
        self
    }

    /// The participant that is not the sender
    pub fn recipient_id(&self) -> UserId {
        if self.participants[0] == self.sender_id {
            self.participants[1]
        } else {
            self.participants[0]
        }
    }

    /// Check if the given user is one of the two participants
    pub fn involves(&self, user_id: UserId) -> bool {
        self.participants.contains(&user_id)
    }

    /// Canonical (unordered) conversation key for the two participants
    #[must_use]
    pub fn conversation_key(a: UserId, b: UserId) -> (UserId, UserId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}
