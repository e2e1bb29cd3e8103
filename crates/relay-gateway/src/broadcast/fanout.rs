//! Fan-out engine
//!
//! Resolves delivery targets through the registries and pushes a cloned
//! event onto each target's outbound queue. A failed send to one
//! connection never aborts delivery to the rest; the failing connection
//! is torn down by its own socket loop.

use crate::events::ServerEvent;
use crate::registry::{RoomTracker, SessionRegistry};
use relay_core::{RoomId, UserId};
use std::sync::Arc;

/// Delivers events to rooms, users, and the whole gateway
pub struct FanoutEngine {
    sessions: Arc<SessionRegistry>,
    rooms: Arc<RoomTracker>,
}

impl FanoutEngine {
    /// Create a fan-out engine over the shared registries
    pub fn new(sessions: Arc<SessionRegistry>, rooms: Arc<RoomTracker>) -> Self {
        Self { sessions, rooms }
    }

    /// Deliver an event to every session subscribed to a room
    ///
    /// `exclude_session` skips the originating session for events the
    /// sender should not receive back (typing, join/leave notices).
    /// Returns the number of connections reached.
    pub async fn to_room(
        &self,
        room_id: RoomId,
        event: ServerEvent,
        exclude_session: Option<&str>,
    ) -> usize {
        let mut sent = 0;

        for session_id in self.rooms.subscribers_of(room_id) {
            if exclude_session == Some(session_id.as_str()) {
                continue;
            }
            let Some(conn) = self.sessions.get(&session_id) else {
                continue;
            };
            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            room_id = %room_id,
            event = event.name(),
            sent = sent,
            "Event fanned out to room"
        );

        sent
    }

    /// Deliver an event to all of a user's live connections
    ///
    /// Delivers nothing when the user is offline; there is no queueing.
    pub async fn to_user(&self, user_id: UserId, event: ServerEvent) -> usize {
        let mut sent = 0;

        for conn in self.sessions.connections_for(user_id) {
            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(
            user_id = %user_id,
            event = event.name(),
            sent = sent,
            "Event fanned out to user"
        );

        sent
    }

    /// Deliver an event to every live connection (presence broadcasts)
    pub async fn to_all(&self, event: ServerEvent) -> usize {
        let mut sent = 0;

        for conn in self.sessions.all_connections() {
            if conn.send(event.clone()).await.is_ok() {
                sent += 1;
            }
        }

        tracing::trace!(event = event.name(), sent = sent, "Event broadcast to all");

        sent
    }
}

impl std::fmt::Debug for FanoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutEngine")
            .field("sessions", &self.sessions)
            .field("rooms", &self.rooms)
            .finish()
    }
}
