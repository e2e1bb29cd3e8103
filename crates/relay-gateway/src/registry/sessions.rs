//! Session registry
//!
//! Tracks all live WebSocket connections using DashMap for thread-safe
//! access. A user is online exactly when their session set is non-empty,
//! which makes this registry the authority for presence transitions.

use crate::connection::Connection;
use dashmap::DashMap;
use relay_core::UserId;
use std::collections::HashSet;
use std::sync::Arc;

/// Registry of live connections and the user -> sessions index
pub struct SessionRegistry {
    /// Active connections by session ID
    connections: DashMap<String, Arc<Connection>>,

    /// User ID to session IDs mapping
    user_sessions: DashMap<UserId, HashSet<String>>,
}

impl SessionRegistry {
    /// Create a new session registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_sessions: DashMap::new(),
        }
    }

    /// Register a connection
    ///
    /// Returns `true` if this is the user's first live connection (the
    /// offline -> online transition).
    pub fn register(&self, connection: Arc<Connection>) -> bool {
        let session_id = connection.session_id().to_string();
        let user_id = connection.user_id();

        self.connections.insert(session_id.clone(), connection);

        let mut sessions = self.user_sessions.entry(user_id).or_default();
        let was_offline = sessions.is_empty();
        sessions.insert(session_id.clone());
        drop(sessions);

        tracing::debug!(
            session_id = %session_id,
            user_id = %user_id,
            first_connection = was_offline,
            "Session registered"
        );

        was_offline
    }

    /// Deregister a connection
    ///
    /// Idempotent. Returns `true` if this was the user's last live
    /// connection (the online -> offline transition); repeat calls for the
    /// same session return `false`.
    ///
    /// Uses `alter`/`retain` for atomic modify-and-cleanup to avoid TOCTOU
    /// races between concurrent disconnects.
    pub fn deregister(&self, session_id: &str) -> bool {
        let Some((_, connection)) = self.connections.remove(session_id) else {
            return false;
        };

        let user_id = connection.user_id();
        self.user_sessions.alter(&user_id, |_, mut sessions| {
            sessions.remove(session_id);
            sessions
        });

        let now_offline = self
            .user_sessions
            .get(&user_id)
            .is_some_and(|sessions| sessions.is_empty());

        // Clean up empty entries
        self.user_sessions.retain(|_, sessions| !sessions.is_empty());

        tracing::debug!(
            session_id = %session_id,
            user_id = %user_id,
            last_connection = now_offline,
            "Session deregistered"
        );

        now_offline
    }

    /// Get a connection by session ID
    pub fn get(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Check if a user has at least one live connection
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.user_sessions
            .get(&user_id)
            .is_some_and(|sessions| !sessions.is_empty())
    }

    /// Get all connections for a user
    pub fn connections_for(&self, user_id: UserId) -> Vec<Arc<Connection>> {
        self.user_sessions
            .get(&user_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| self.connections.get(sid).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get all live connections
    pub fn all_connections(&self) -> Vec<Arc<Connection>> {
        self.connections.iter().map(|r| r.clone()).collect()
    }

    /// Get the total number of live connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of online users
    pub fn user_count(&self) -> usize {
        self.user_sessions.len()
    }

    /// Check if a session exists
    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("connections", &self.connections.len())
            .field("users", &self.user_sessions.len())
            .finish()
    }
}
