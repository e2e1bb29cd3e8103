//! Presence status handler

use crate::connection::Connection;
use crate::events::ServerEvent;
use crate::handlers::HandlerResult;
use crate::server::GatewayState;
use chrono::Utc;
use relay_core::PresenceStatus;
use std::sync::Arc;

/// Handles explicit presence changes
pub struct PresenceHandler;

impl PresenceHandler {
    /// Persist the user's chosen status and announce it gateway-wide
    ///
    /// The status is taken at face value, including `offline`; the session
    /// registry still decides the real online/offline transitions.
    pub async fn set_status(
        state: &GatewayState,
        conn: &Arc<Connection>,
        status: PresenceStatus,
    ) -> HandlerResult<()> {
        state
            .users()
            .update_presence(conn.user_id(), status, Utc::now())
            .await?;

        tracing::debug!(
            user_id = %conn.user_id(),
            status = %status,
            "User status changed"
        );

        state
            .fanout()
            .to_all(ServerEvent::UserStatusChanged {
                user_id: conn.user_id(),
                status,
            })
            .await;

        Ok(())
    }
}
