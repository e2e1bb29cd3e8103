//! Room membership tracker
//!
//! Maps each room to the set of live sessions subscribed to it. This is
//! the gateway's runtime view only; persisted room membership lives in
//! the store. Joining a room here means the connection receives the
//! room's live traffic.

use dashmap::DashMap;
use relay_core::RoomId;
use std::collections::HashSet;

/// Room ID to session IDs mapping
pub struct RoomTracker {
    rooms: DashMap<RoomId, HashSet<String>>,
}

impl RoomTracker {
    /// Create a new room tracker
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Subscribe a session to a room
    ///
    /// Idempotent. Returns `true` if the session was newly added, `false`
    /// if it was already subscribed.
    pub fn join(&self, room_id: RoomId, session_id: &str) -> bool {
        let inserted = self
            .rooms
            .entry(room_id)
            .or_default()
            .insert(session_id.to_string());

        if inserted {
            tracing::trace!(room_id = %room_id, session_id = %session_id, "Session joined room");
        }

        inserted
    }

    /// Unsubscribe a session from a room
    ///
    /// Returns `true` if the session was subscribed. Safe to call for
    /// unknown rooms or sessions.
    pub fn leave(&self, room_id: RoomId, session_id: &str) -> bool {
        let mut removed = false;
        self.rooms.alter(&room_id, |_, mut sessions| {
            removed = sessions.remove(session_id);
            sessions
        });
        self.rooms.retain(|_, sessions| !sessions.is_empty());

        if removed {
            tracing::trace!(room_id = %room_id, session_id = %session_id, "Session left room");
        }

        removed
    }

    /// Get the sessions subscribed to a room
    pub fn subscribers_of(&self, room_id: RoomId) -> Vec<String> {
        self.rooms
            .get(&room_id)
            .map(|sessions| sessions.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of sessions subscribed to a room
    pub fn subscriber_count(&self, room_id: RoomId) -> usize {
        self.rooms
            .get(&room_id)
            .map_or(0, |sessions| sessions.len())
    }

    /// Check if a session subscribes to a room
    pub fn is_subscribed(&self, room_id: RoomId, session_id: &str) -> bool {
        self.rooms
            .get(&room_id)
            .is_some_and(|sessions| sessions.contains(session_id))
    }

    /// Remove a session from every room (disconnect cleanup)
    pub fn remove_session(&self, session_id: &str) {
        self.rooms.alter_all(|_, mut sessions| {
            sessions.remove(session_id);
            sessions
        });
        self.rooms.retain(|_, sessions| !sessions.is_empty());
    }

    /// Number of rooms with at least one subscriber
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoomTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomTracker")
            .field("rooms", &self.rooms.len())
            .finish()
    }
}
