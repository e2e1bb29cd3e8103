//! Individual WebSocket connection
//!
//! Represents a single authenticated WebSocket connection and its state.
//! Authentication happens during the HTTP upgrade, so the user identity is
//! fixed for the lifetime of the connection.

use crate::events::ServerEvent;
use relay_core::{RoomId, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Outbound queue capacity per connection
pub const OUTBOUND_BUFFER_SIZE: usize = 100;

/// A single authenticated WebSocket connection
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Authenticated user ID
    user_id: UserId,

    /// Authenticated username (carried in broadcast payloads)
    username: String,

    /// Channel to send events to the WebSocket
    sender: mpsc::Sender<ServerEvent>,

    /// Rooms this connection is subscribed to
    rooms: RwLock<HashSet<RoomId>>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection with a fresh session ID
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        sender: mpsc::Sender<ServerEvent>,
    ) -> Arc<Self> {
        Arc::new(Self {
            session_id: Uuid::new_v4().to_string(),
            user_id,
            username: username.into(),
            sender,
            rooms: RwLock::new(HashSet::new()),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the authenticated user ID
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Get the authenticated username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Add a room subscription
    pub async fn subscribe_room(&self, room_id: RoomId) {
        self.rooms.write().await.insert(room_id);
    }

    /// Remove a room subscription
    pub async fn unsubscribe_room(&self, room_id: RoomId) {
        self.rooms.write().await.remove(&room_id);
    }

    /// Get all subscribed rooms
    pub async fn rooms(&self) -> Vec<RoomId> {
        self.rooms.read().await.iter().copied().collect()
    }

    /// Check if subscribed to a room
    pub async fn is_subscribed_to(&self, room_id: RoomId) -> bool {
        self.rooms.read().await.contains(&room_id)
    }

    /// Get connection age
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Send an event to this connection
    pub async fn send(
        &self,
        event: ServerEvent,
    ) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event).await
    }

    /// Check if the sender channel is closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
