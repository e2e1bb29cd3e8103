//! Test fixtures
//!
//! A `TestGateway` owns a full gateway state wired to in-memory stores;
//! `TestClient` pairs a registered connection with the receiving end of
//! its outbound queue.

use relay_common::{AppConfig, AppSettings, Environment, JwtConfig, ServerConfig, TokenVerifier};
use relay_core::{Room, RoomId, RoomVisibility, User, UserId};
use relay_gateway::connection::Connection;
use relay_gateway::events::ServerEvent;
use relay_gateway::protocol::ClientEvent;
use relay_gateway::server::{cleanup_connection, handle_text_frame, open_connection};
use relay_gateway::GatewayState;
use relay_store::{
    MemoryDirectMessageStore, MemoryMessageStore, MemoryRoomStore, MemoryUserStore,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Shared HMAC secret for test tokens
pub const TEST_SECRET: &str = "integration-test-secret-not-for-production";

/// Gateway state plus concrete store handles for seeding and assertions
pub struct TestGateway {
    pub state: GatewayState,
    pub users: Arc<MemoryUserStore>,
    pub rooms: Arc<MemoryRoomStore>,
    pub messages: Arc<MemoryMessageStore>,
    pub dms: Arc<MemoryDirectMessageStore>,
}

impl TestGateway {
    /// Build a gateway over fresh registries and empty stores
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let rooms = Arc::new(MemoryRoomStore::new());
        let messages = Arc::new(MemoryMessageStore::new());
        let dms = Arc::new(MemoryDirectMessageStore::new());

        let state = GatewayState::new(
            users.clone(),
            rooms.clone(),
            messages.clone(),
            dms.clone(),
            TokenVerifier::new(TEST_SECRET),
            test_config(),
        );

        Self {
            state,
            users,
            rooms,
            messages,
            dms,
        }
    }

    /// Seed a user record
    pub fn seed_user(&self, username: &str) -> User {
        let user = User::new(UserId::new(), username);
        self.users.insert(user.clone());
        user
    }

    /// Seed a public room created by `creator`
    pub fn seed_room(&self, name: &str, creator: UserId) -> Room {
        let room = Room::new(RoomId::new(), name, RoomVisibility::Public, creator);
        self.rooms.insert(room.clone());
        room
    }

    /// Seed a private room created by `creator` with the given members
    pub fn seed_private_room(&self, name: &str, creator: UserId, members: &[UserId]) -> Room {
        let mut room = Room::new(RoomId::new(), name, RoomVisibility::Private, creator);
        for member in members {
            room.add_member(*member);
        }
        self.rooms.insert(room.clone());
        room
    }

    /// Open a connection for a user, as the socket handshake would
    pub async fn connect(&self, user: &User) -> TestClient {
        let (tx, rx) = mpsc::channel(100);
        let conn = open_connection(&self.state, user.id, &user.username, tx).await;
        TestClient { conn, rx }
    }

    /// Tear a connection down, as the socket loop would on disconnect
    pub async fn disconnect(&self, client: &TestClient) {
        cleanup_connection(&self.state, &client.conn).await;
    }
}

impl Default for TestGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// One simulated client connection
pub struct TestClient {
    pub conn: Arc<Connection>,
    pub rx: mpsc::Receiver<ServerEvent>,
}

impl TestClient {
    /// Send a client event through the full frame path (serialize,
    /// parse, dispatch, error routing)
    pub async fn send(&self, gateway: &TestGateway, event: &ClientEvent) {
        let json = serde_json::to_string(event).expect("client event serializes");
        handle_text_frame(&gateway.state, &self.conn, &json).await;
    }

    /// Send a raw text frame
    pub async fn send_raw(&self, gateway: &TestGateway, text: &str) {
        handle_text_frame(&gateway.state, &self.conn, text).await;
    }

    /// Pop the next received event, if any
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.rx.try_recv().ok()
    }

    /// Drain everything received so far
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Pop the next event, panicking if nothing was delivered
    pub fn expect_event(&mut self) -> ServerEvent {
        self.try_recv().expect("expected a delivered event")
    }

    /// Assert nothing was delivered
    pub fn expect_silence(&mut self) {
        if let Some(event) = self.try_recv() {
            panic!("expected no delivery, got {event:?}");
        }
    }
}

/// A minimal configuration for tests
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "relay-gateway-tests".to_string(),
            env: Environment::Development,
        },
        gateway: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}
