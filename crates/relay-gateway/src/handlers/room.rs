//! Room join/leave handlers

use crate::connection::Connection;
use crate::events::ServerEvent;
use crate::handlers::HandlerResult;
use crate::server::GatewayState;
use relay_core::{DomainError, RoomId};
use std::sync::Arc;

/// Handles room subscription events
pub struct RoomHandler;

impl RoomHandler {
    /// Subscribe the connection to a room's live traffic
    ///
    /// The room must exist; private rooms additionally require persisted
    /// membership. A repeat join is a no-op and emits no duplicate
    /// `user_joined`.
    pub async fn join(
        state: &GatewayState,
        conn: &Arc<Connection>,
        room_id: RoomId,
    ) -> HandlerResult<()> {
        let room = state
            .room_store()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?;

        if room.is_private() && !room.is_member(conn.user_id()) {
            return Err(DomainError::NotRoomMember.into());
        }

        let newly_joined = state.rooms().join(room_id, conn.session_id());
        conn.subscribe_room(room_id).await;

        if newly_joined {
            tracing::info!(
                session_id = %conn.session_id(),
                user_id = %conn.user_id(),
                room_id = %room_id,
                "User joined room"
            );

            state
                .fanout()
                .to_room(
                    room_id,
                    ServerEvent::UserJoined {
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

    /// Drop the room subscription and the persisted membership together
    pub async fn leave(
        state: &GatewayState,
        conn: &Arc<Connection>,
        room_id: RoomId,
    ) -> HandlerResult<()> {
        state
            .room_store()
            .remove_member(room_id, conn.user_id())
            .await?;

        let was_subscribed = state.rooms().leave(room_id, conn.session_id());
        conn.unsubscribe_room(room_id).await;

        if was_subscribed {
            tracing::info!(
                session_id = %conn.session_id(),
                user_id = %conn.user_id(),
                room_id = %room_id,
                "User left room"
            );

            state
                .fanout()
                .to_room(
                    room_id,
                    ServerEvent::UserLeft {
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
}
