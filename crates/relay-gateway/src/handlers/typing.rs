//! Typing indicator handlers

use crate::connection::Connection;
use crate::events::ServerEvent;
use crate::handlers::HandlerResult;
use crate::server::GatewayState;
use relay_core::RoomId;
use std::sync::Arc;

/// Handles typing indicator events
pub struct TypingHandler;

impl TypingHandler {
    /// Mark the user as typing in a room
    ///
    /// A refresh while already typing only extends the idle expiry;
    /// subscribers are notified once per typing burst.
    pub async fn start(
        state: &GatewayState,
        conn: &Arc<Connection>,
        room_id: RoomId,
    ) -> HandlerResult<()> {
        if state.typing().start(room_id, conn.user_id()) {
            state
                .fanout()
                .to_room(
                    room_id,
                    ServerEvent::UserTyping {
                        room_id,
                        user_id: conn.user_id(),
                        username: conn.username().to_string(),
                    },
                    Some(conn.session_id()),
                )
                .await;
        }

        Ok(())
    }

    /// Clear the user's typing state in a room
    pub async fn stop(
        state: &GatewayState,
        conn: &Arc<Connection>,
        room_id: RoomId,
    ) -> HandlerResult<()> {
        if state.typing().stop(room_id, conn.user_id()) {
            state
                .fanout()
                .to_room(
                    room_id,
                    ServerEvent::UserStoppedTyping {
                        room_id,
                        user_id: conn.user_id(),
                    },
                    Some(conn.session_id()),
                )
                .await;
        }

        Ok(())
    }
}
