//! Room entity - a named group-messaging context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{RoomId, UserId};

/// Room visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomVisibility {
    #[default]
    Public,
    Private,
}

/// Room entity
///
/// `members` is the *persisted* membership (who is allowed to subscribe),
/// distinct from the gateway's runtime view of who is currently subscribed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub visibility: RoomVisibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_by: UserId,
    pub members: Vec<UserId>,
    pub admins: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Create a new room; the creator becomes its first member and admin
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        visibility: RoomVisibility,
        created_by: UserId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            visibility,
            avatar: None,
            created_by,
            members: vec![created_by],
            admins: vec![created_by],
            created_at: Utc::now(),
        }
    }

    /// Check if the room is private
    #[inline]
    pub fn is_private(&self) -> bool {
        self.visibility == RoomVisibility::Private
    }

    /// Check persisted membership
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.contains(&user_id)
    }

    /// Check admin membership
    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admins.contains(&user_id)
    }

    /// Add a persisted member (idempotent)
    pub fn add_member(&mut self, user_id: UserId) {
        if !self.is_member(user_id) {
            self.members.push(user_id);
        }
    }

    /// Remove a persisted member (no-op if absent)
    pub fn remove_member(&mut self, user_id: UserId) {
        self.members.retain(|m| *m != user_id);
    }
}
