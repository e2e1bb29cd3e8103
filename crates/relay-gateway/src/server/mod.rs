//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::{cleanup_connection, gateway_handler, handle_text_frame, open_connection};
pub use state::GatewayState;

use axum::{routing::get, Router};
use relay_common::{AppConfig, AppError, TokenVerifier};
use relay_store::{
    MemoryDirectMessageStore, MemoryMessageStore, MemoryRoomStore, MemoryUserStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
///
/// Wires the in-memory reference stores; a deployment with a durable
/// backend swaps these for its own `relay-core` trait implementations.
pub fn create_gateway_state(config: AppConfig) -> GatewayState {
    let verifier = TokenVerifier::new(&config.jwt.secret);

    GatewayState::new(
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryRoomStore::new()),
        Arc::new(MemoryMessageStore::new()),
        Arc::new(MemoryDirectMessageStore::new()),
        verifier,
        config,
    )
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.gateway.port));

    let state = create_gateway_state(config);
    let app = create_app(state);

    run_server(app, addr).await
}
