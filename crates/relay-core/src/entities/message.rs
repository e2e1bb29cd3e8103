//! Message entity - represents a room message

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Reaction;
use crate::value_objects::{MessageId, RoomId, UserId};

/// Maximum message content length in characters
pub const CONTENT_MAX_CHARS: usize = 2000;

/// Window after creation during which the sender may edit a message
pub const EDIT_WINDOW: Duration = Duration::minutes(5);

/// Message kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    File,
    Image,
}

/// Outcome of toggling a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionChange {
    Added,
    Removed,
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub content: String,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<MessageId>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read_by: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new text message
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        sender_id: UserId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            room_id,
            sender_id,
            content: content.into(),
            kind: MessageKind::Text,
            file_url: None,
            reply_to: None,
            reactions: Vec::new(),
            edited: false,
            edited_at: None,
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

    /// Mark this message as a reply
    #[must_use]
    pub fn with_reply_to(mut self, target: MessageId) -> Self {
        self.reply_to = Some(target);
        self
    }

    /// Check if the given user sent this message
    #[inline]
    pub fn is_sender(&self, user_id: UserId) -> bool {
        self.sender_id == user_id
    }

    /// Check if the message is still inside its edit window at `now`
    pub fn within_edit_window(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at < EDIT_WINDOW
    }

    /// Apply an edit: replaces the content and sets the edited flag.
    ///
    /// The `edited` flag never reverts once set.
    pub fn apply_edit(&mut self, content: String, now: DateTime<Utc>) {
        self.content = content;
        self.edited = true;
        self.edited_at = Some(now);
    }

    /// Toggle a (user, emoji) reaction.
    ///
    /// The first call adds the pair, the second call with the same pair
    /// removes it. Duplicates can never accumulate.
    pub fn toggle_reaction(&mut self, user_id: UserId, emoji: &str) -> ReactionChange {
        if self.reactions.iter().any(|r| r.matches(user_id, emoji)) {
            self.reactions.retain(|r| !r.matches(user_id, emoji));
            ReactionChange::Removed
        } else {
            self.reactions.push(Reaction::new(emoji, user_id));
            ReactionChange::Added
        }
    }

    /// Add a user to the read-by set. Returns false if already present.
    pub fn mark_read(&mut self, user_id: UserId) -> bool {
        if self.read_by.contains(&user_id) {
            false
        } else {
            self.read_by.push(user_id);
            true
        }
    }

    /// Check if message content is empty (whitespace only)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
