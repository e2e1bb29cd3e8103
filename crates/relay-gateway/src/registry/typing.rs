//! Typing tracker
//!
//! Tracks which users are typing in which rooms. Entries carry a
//! timestamp and expire after an idle period, so a client that crashes
//! mid-keystroke does not leave a stuck indicator. Expired entries are
//! pruned lazily on read.

use dashmap::DashMap;
use relay_core::{RoomId, UserId};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Idle period after which a typing entry is considered stale
pub const TYPING_IDLE_EXPIRY: Duration = Duration::from_secs(10);

/// Room ID to typing users mapping
pub struct TypingTracker {
    typing: DashMap<RoomId, HashMap<UserId, Instant>>,
    expiry: Duration,
}

impl TypingTracker {
    /// Create a tracker with the default idle expiry
    #[must_use]
    pub fn new() -> Self {
        Self::with_expiry(TYPING_IDLE_EXPIRY)
    }

    /// Create a tracker with a custom idle expiry
    #[must_use]
    pub fn with_expiry(expiry: Duration) -> Self {
        Self {
            typing: DashMap::new(),
            expiry,
        }
    }

    /// Record that a user started (or is still) typing in a room
    ///
    /// Returns `true` if the user was not already typing there; repeat
    /// calls refresh the timestamp and return `false`.
    pub fn start(&self, room_id: RoomId, user_id: UserId) -> bool {
        let mut entries = self.typing.entry(room_id).or_default();
        let newly_typing = !Self::is_live(&entries, user_id, self.expiry);
        entries.insert(user_id, Instant::now());
        newly_typing
    }

    /// Record that a user stopped typing in a room
    ///
    /// Returns `true` if the user had a live typing entry there.
    pub fn stop(&self, room_id: RoomId, user_id: UserId) -> bool {
        let mut was_typing = false;
        self.typing.alter(&room_id, |_, mut entries| {
            was_typing = Self::is_live(&entries, user_id, self.expiry);
            entries.remove(&user_id);
            entries
        });
        self.typing.retain(|_, entries| !entries.is_empty());
        was_typing
    }

    /// Get the users currently typing in a room, pruning stale entries
    pub fn typing_in(&self, room_id: RoomId) -> Vec<UserId> {
        let expiry = self.expiry;
        let mut users = Vec::new();
        self.typing.alter(&room_id, |_, mut entries| {
            entries.retain(|_, started| started.elapsed() < expiry);
            users = entries.keys().copied().collect();
            entries
        });
        self.typing.retain(|_, entries| !entries.is_empty());
        users
    }

    /// Remove a user's typing entries everywhere (disconnect cleanup)
    ///
    /// Returns the rooms where the user had a live entry, so callers can
    /// broadcast the stop indicator.
    pub fn remove_user(&self, user_id: UserId) -> Vec<RoomId> {
        let expiry = self.expiry;
        let mut rooms = Vec::new();
        self.typing.alter_all(|room_id, mut entries| {
            if Self::is_live(&entries, user_id, expiry) {
                rooms.push(*room_id);
            }
            entries.remove(&user_id);
            entries
        });
        self.typing.retain(|_, entries| !entries.is_empty());
        rooms
    }

    fn is_live(entries: &HashMap<UserId, Instant>, user_id: UserId, expiry: Duration) -> bool {
        entries
            .get(&user_id)
            .is_some_and(|started| started.elapsed() < expiry)
    }
}

impl Default for TypingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypingTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingTracker")
            .field("rooms", &self.typing.len())
            .field("expiry", &self.expiry)
            .finish()
    }
}
