//! Client event handlers
//!
//! Each inbound event is dispatched to a handler through a single match
//! on the exhaustive `ClientEvent` enum. Handler failures surface as a
//! scoped `error` event on the originating connection; bystanders never
//! see a failed operation.

mod dm;
mod error;
mod message;
mod presence;
mod room;
mod typing;

pub use dm::DmHandler;
pub use error::{HandlerError, HandlerResult};
pub use message::MessageHandler;
pub use presence::PresenceHandler;
pub use room::RoomHandler;
pub use typing::TypingHandler;

use crate::connection::Connection;
use crate::protocol::ClientEvent;
use crate::server::GatewayState;
use relay_core::{DomainError, CONTENT_MAX_CHARS};
use std::sync::Arc;

/// Dispatch incoming client events to the appropriate handler
pub struct EventDispatcher;

impl EventDispatcher {
    /// Handle an incoming client event
    pub async fn dispatch(
        state: &GatewayState,
        conn: &Arc<Connection>,
        event: ClientEvent,
    ) -> HandlerResult<()> {
        match event {
            ClientEvent::JoinRoom { room_id } => RoomHandler::join(state, conn, room_id).await,
            ClientEvent::LeaveRoom { room_id } => RoomHandler::leave(state, conn, room_id).await,
            ClientEvent::SendMessage {
                room_id,
                content,
                kind,
                file_url,
                reply_to,
            } => {
                MessageHandler::send(state, conn, room_id, content, kind, file_url, reply_to).await
            }
            ClientEvent::SendDm {
                recipient_id,
                content,
                kind,
                file_url,
            } => DmHandler::send(state, conn, recipient_id, content, kind, file_url).await,
            ClientEvent::EditMessage {
                message_id,
                room_id,
                content,
            } => MessageHandler::edit(state, conn, message_id, room_id, content).await,
            ClientEvent::DeleteMessage {
                message_id,
                room_id,
            } => MessageHandler::delete(state, conn, message_id, room_id).await,
            ClientEvent::AddReaction {
                message_id,
                room_id,
                emoji,
            } => MessageHandler::react(state, conn, message_id, room_id, emoji).await,
            ClientEvent::MessageRead {
                message_id,
                room_id,
            } => MessageHandler::mark_read(state, conn, message_id, room_id).await,
            ClientEvent::TypingStart { room_id } => TypingHandler::start(state, conn, room_id).await,
            ClientEvent::TypingStop { room_id } => TypingHandler::stop(state, conn, room_id).await,
            ClientEvent::UserStatus { status } => {
                PresenceHandler::set_status(state, conn, status).await
            }
        }
    }
}

/// Validate message content
///
/// Content may be whitespace-only only when a file is attached; length is
/// capped in characters, matching the stored schema limit.
pub(crate) fn validate_content(content: &str, file_url: Option<&str>) -> HandlerResult<()> {
    if content.trim().is_empty() && file_url.is_none() {
        return Err(DomainError::Validation("message content is empty".to_string()).into());
    }
    if content.chars().count() > CONTENT_MAX_CHARS {
        return Err(DomainError::ContentTooLong {
            max: CONTENT_MAX_CHARS,
        }
        .into());
    }
    Ok(())
}
