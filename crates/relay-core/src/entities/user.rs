//! User entity - represents a chat user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Presence status for a user
///
/// Derived from the live connection count plus an explicit status override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    #[default]
    Offline,
    Away,
    Dnd,
}

impl PresenceStatus {
    /// Get the string representation of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Away => "away",
            Self::Dnd => "dnd",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User entity
///
/// The gateway's copy is a cache; it is authoritative only for whether the
/// user's live session set is non-empty right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub status: PresenceStatus,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with offline presence
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: username.into(),
            avatar: None,
            status: PresenceStatus::Offline,
            last_seen: now,
            created_at: now,
        }
    }

    /// Check if the user shows as online
    #[inline]
    pub fn is_online(&self) -> bool {
        self.status == PresenceStatus::Online
    }
}
