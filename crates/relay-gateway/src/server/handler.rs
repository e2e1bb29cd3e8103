//! WebSocket handler
//!
//! Authenticates the upgrade request, then runs the per-connection socket
//! loop: one task draining the outbound queue, one task processing
//! inbound frames strictly in arrival order.

use crate::connection::{Connection, OUTBOUND_BUFFER_SIZE};
use crate::events::ServerEvent;
use crate::handlers::EventDispatcher;
use crate::protocol::ClientEvent;
use crate::server::GatewayState;
use axum::{
    extract::{ws::Message, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use relay_core::PresenceStatus;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Query parameters of the upgrade request
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    #[serde(default)]
    token: Option<String>,
}

/// WebSocket gateway handler
///
/// Token verification happens before the upgrade: a bad token is a plain
/// 401 response and no gateway state is touched.
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let token = params.token.unwrap_or_default();

    let claims = match state.verifier().verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected gateway handshake");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(error = %e, "Token subject is not a valid user id");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    let username = claims.username;
    ws.on_upgrade(move |socket| handle_socket(state, socket, user_id, username))
        .into_response()
}

/// Register an authenticated session and announce presence
///
/// The `user_online` announcement goes out before registration, so the
/// new connection never receives its own. Only the user's first
/// connection persists the online status.
pub async fn open_connection(
    state: &GatewayState,
    user_id: relay_core::UserId,
    username: &str,
    tx: mpsc::Sender<ServerEvent>,
) -> Arc<Connection> {
    let connection = Connection::new(user_id, username, tx);

    state
        .fanout()
        .to_all(ServerEvent::UserOnline {
            user_id,
            username: username.to_string(),
        })
        .await;

    let first_connection = state.sessions().register(connection.clone());

    if first_connection {
        state
            .users()
            .update_presence(user_id, PresenceStatus::Online, Utc::now())
            .await
            .ok();
    }

    tracing::info!(
        session_id = %connection.session_id(),
        user_id = %user_id,
        first_connection = first_connection,
        "WebSocket connection established"
    );

    connection
}

/// Handle an upgraded, authenticated WebSocket connection
async fn handle_socket(
    state: GatewayState,
    socket: axum::extract::ws::WebSocket,
    user_id: relay_core::UserId,
    username: String,
) {
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(OUTBOUND_BUFFER_SIZE);
    let connection = open_connection(&state, user_id, &username, tx).await;
    let session_id = connection.session_id().to_string();

    let (mut ws_sink, mut ws_stream) = socket.split();

    let state_recv = state.clone();
    let connection_recv = connection.clone();

    // Process inbound frames in arrival order; handler failures produce a
    // scoped error event and the loop continues
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    handle_text_frame(&state_recv, &connection_recv, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        session_id = %connection_recv.session_id(),
                        "Binary frames not supported"
                    );
                    connection_recv
                        .send(ServerEvent::Error {
                            code: "INVALID_PAYLOAD".to_string(),
                            message: "binary frames are not supported".to_string(),
                        })
                        .await
                        .ok();
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Keepalive is handled by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(
                        session_id = %connection_recv.session_id(),
                        "Client closed connection"
                    );
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %connection_recv.session_id(),
                        error = %e,
                        "WebSocket error"
                    );
                    break;
                }
            }
        }
    });

    let session_id_send = session_id.clone();

    // Drain the outbound queue into the socket
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event.to_json() {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json.into())).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send event to WebSocket"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        session_id = %session_id_send,
                        error = %e,
                        "Failed to serialize outbound event"
                    );
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    tokio::select! {
        _ = recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
        }
        _ = send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
        }
    }

    cleanup_connection(&state, &connection).await;
}

/// Parse and dispatch one inbound text frame
///
/// Any failure, parse or handler, becomes a scoped `error` event on the
/// originating connection; the transport stays up either way.
pub async fn handle_text_frame(state: &GatewayState, connection: &Arc<Connection>, text: &str) {
    let event = match ClientEvent::from_json(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(
                session_id = %connection.session_id(),
                error = %e,
                "Failed to parse inbound frame"
            );
            connection
                .send(ServerEvent::Error {
                    code: "INVALID_PAYLOAD".to_string(),
                    message: format!("malformed event: {e}"),
                })
                .await
                .ok();
            return;
        }
    };

    tracing::trace!(
        session_id = %connection.session_id(),
        event = event.name(),
        "Received event"
    );

    if let Err(e) = EventDispatcher::dispatch(state, connection, event).await {
        tracing::debug!(
            session_id = %connection.session_id(),
            code = e.code(),
            error = %e,
            "Handler rejected event"
        );
        connection.send(e.to_event()).await.ok();
    }
}

/// Clean up a connection on disconnect
///
/// Best-effort throughout: typing indicators are cleared first, then the
/// room and session registries, and only the user's last connection
/// triggers the offline transition and its single `user_offline`.
pub async fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    let session_id = connection.session_id();
    let user_id = connection.user_id();

    tracing::info!(session_id = %session_id, user_id = %user_id, "Cleaning up connection");

    for room_id in state.typing().remove_user(user_id) {
        state
            .fanout()
            .to_room(
                room_id,
                ServerEvent::UserStoppedTyping { room_id, user_id },
                Some(session_id),
            )
            .await;
    }

    state.rooms().remove_session(session_id);

    let last_connection = state.sessions().deregister(session_id);
    if last_connection {
        let last_seen = Utc::now();

        state
            .users()
            .update_presence(user_id, PresenceStatus::Offline, last_seen)
            .await
            .ok();

        state
            .fanout()
            .to_all(ServerEvent::UserOffline { user_id, last_seen })
            .await;

        tracing::debug!(user_id = %user_id, "User went offline");
    }
}
