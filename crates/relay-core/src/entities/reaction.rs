//! Reaction entity - an (emoji, user) pair attached to a message

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// A single emoji reaction on a message
///
/// A message never holds two live reactions with the same (user, emoji) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    pub user_id: UserId,
}

impl Reaction {
    pub fn new(emoji: impl Into<String>, user_id: UserId) -> Self {
        Self {
            emoji: emoji.into(),
            user_id,
        }
    }

    /// Check if this reaction matches the given (user, emoji) pair
    pub fn matches(&self, user_id: UserId, emoji: &str) -> bool {
        self.user_id == user_id && self.emoji == emoji
    }
}
