//! Gateway state
//!
//! Application state for the gateway server. Registries and collaborators
//! are owned here and injected where needed, so tests can build a fresh
//! state per case with no ambient globals.

use crate::broadcast::FanoutEngine;
use crate::registry::{RoomTracker, SessionRegistry, TypingTracker};
use relay_common::{AppConfig, TokenVerifier};
use relay_core::{DirectMessageStore, MessageStore, RoomStore, UserStore};
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// User store (presence persistence, recipient lookup)
    users: Arc<dyn UserStore>,
    /// Room store (existence and membership checks)
    room_store: Arc<dyn RoomStore>,
    /// Room message store
    messages: Arc<dyn MessageStore>,
    /// Direct message store
    dms: Arc<dyn DirectMessageStore>,
    /// Token verifier for the upgrade handshake
    verifier: Arc<TokenVerifier>,
    /// Live connection registry
    sessions: Arc<SessionRegistry>,
    /// Room subscription tracker
    rooms: Arc<RoomTracker>,
    /// Typing indicator tracker
    typing: Arc<TypingTracker>,
    /// Fan-out engine over the registries
    fanout: Arc<FanoutEngine>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state with fresh registries
    pub fn new(
        users: Arc<dyn UserStore>,
        room_store: Arc<dyn RoomStore>,
        messages: Arc<dyn MessageStore>,
        dms: Arc<dyn DirectMessageStore>,
        verifier: TokenVerifier,
        config: AppConfig,
    ) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let rooms = Arc::new(RoomTracker::new());
        let typing = Arc::new(TypingTracker::new());
        let fanout = Arc::new(FanoutEngine::new(sessions.clone(), rooms.clone()));

        Self {
            users,
            room_store,
            messages,
            dms,
            verifier: Arc::new(verifier),
            sessions,
            rooms,
            typing,
            fanout,
            config: Arc::new(config),
        }
    }

    /// Get the user store
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Get the room store
    pub fn room_store(&self) -> &dyn RoomStore {
        self.room_store.as_ref()
    }

    /// Get the message store
    pub fn messages(&self) -> &dyn MessageStore {
        self.messages.as_ref()
    }

    /// Get the direct message store
    pub fn dms(&self) -> &dyn DirectMessageStore {
        self.dms.as_ref()
    }

    /// Get the token verifier
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Get the session registry
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Get the room tracker
    pub fn rooms(&self) -> &RoomTracker {
        &self.rooms
    }

    /// Get the typing tracker
    pub fn typing(&self) -> &TypingTracker {
        &self.typing
    }

    /// Get the fan-out engine
    pub fn fanout(&self) -> &FanoutEngine {
        &self.fanout
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("sessions", &self.sessions)
            .field("rooms", &self.rooms)
            .field("typing", &self.typing)
            .finish_non_exhaustive()
    }
}
