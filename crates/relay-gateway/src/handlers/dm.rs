//! Direct message handler

use crate::connection::Connection;
use crate::events::ServerEvent;
use crate::handlers::{validate_content, HandlerResult};
use crate::server::GatewayState;
use relay_core::{DirectMessage, DomainError, MessageId, MessageKind, UserId};
use std::sync::Arc;

/// Handles direct message events
pub struct DmHandler;

impl DmHandler {
    /// Persist a direct message, deliver live copies, ack the sender
    ///
    /// An offline recipient gets no live delivery and nothing is queued;
    /// the conversation history query covers the gap on their next
    /// connect. The sender always gets the `dm_sent` acknowledgement with
    /// the full stored message.
    pub async fn send(
        state: &GatewayState,
        conn: &Arc<Connection>,
        recipient_id: UserId,
        content: String,
        kind: MessageKind,
        file_url: Option<String>,
    ) -> HandlerResult<()> {
        validate_content(&content, file_url.as_deref())?;

        state
            .users()
            .find_by_id(recipient_id)
            .await?
            .ok_or(DomainError::UserNotFound(recipient_id))?;

        let mut message =
            DirectMessage::new(MessageId::new(), conn.user_id(), recipient_id, content)
                .with_kind(kind);
        if let Some(url) = file_url {
            message = message.with_file_url(url);
        }

        state.dms().create(&message).await?;

        let delivered = state
            .fanout()
            .to_user(
                recipient_id,
                ServerEvent::NewDm {
                    message: message.clone(),
                },
            )
            .await;

        tracing::debug!(
            message_id = %message.id,
            sender_id = %conn.user_id(),
            recipient_id = %recipient_id,
            live_deliveries = delivered,
            "Direct message persisted"
        );

        conn.send(ServerEvent::DmSent { message }).await.ok();

        Ok(())
    }
}
