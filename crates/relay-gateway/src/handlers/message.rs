//! Room message handlers: send, edit, delete, reactions, read receipts

use crate::connection::Connection;
use crate::events::ServerEvent;
use crate::handlers::{validate_content, HandlerResult};
use crate::server::GatewayState;
use chrono::Utc;
use relay_core::{DomainError, Message, MessageId, MessageKind, RoomId};
use std::sync::Arc;

/// Handles room message events
pub struct MessageHandler;

impl MessageHandler {
    /// Persist a new room message, then fan it out
    ///
    /// Fan-out happens only after the store accepts the message, so no
    /// subscriber ever sees a message that was not persisted. The sender
    /// receives the broadcast like everyone else, plus a delivery
    /// acknowledgement on the originating connection.
    pub async fn send(
        state: &GatewayState,
        conn: &Arc<Connection>,
        room_id: RoomId,
        content: String,
        kind: MessageKind,
        file_url: Option<String>,
        reply_to: Option<MessageId>,
    ) -> HandlerResult<()> {
        validate_content(&content, file_url.as_deref())?;

        state
            .room_store()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?;

        let mut message =
            Message::new(MessageId::new(), room_id, conn.user_id(), content).with_kind(kind);
        if let Some(url) = file_url {
            message = message.with_file_url(url);
        }
        if let Some(target) = reply_to {
            message = message.with_reply_to(target);
        }

        state.messages().create(&message).await?;

        tracing::debug!(
            message_id = %message.id,
            room_id = %room_id,
            sender_id = %conn.user_id(),
            "Message persisted"
        );

        let message_id = message.id;
        state
            .fanout()
            .to_room(room_id, ServerEvent::NewMessage { message }, None)
            .await;

        conn.send(ServerEvent::MessageDelivered {
            message_id,
            room_id,
        })
        .await
        .ok();

        Ok(())
    }

    /// Edit a message: sender only, inside the edit window
    ///
    /// Nothing is persisted or broadcast when either check fails.
    pub async fn edit(
        state: &GatewayState,
        conn: &Arc<Connection>,
        message_id: MessageId,
        room_id: RoomId,
        content: String,
    ) -> HandlerResult<()> {
        validate_content(&content, None)?;

        let mut message = state
            .messages()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if !message.is_sender(conn.user_id()) {
            return Err(DomainError::NotMessageSender.into());
        }

        let now = Utc::now();
        if !message.within_edit_window(now) {
            return Err(DomainError::EditWindowExpired.into());
        }

        message.apply_edit(content.clone(), now);
        state.messages().update(&message).await?;

        state
            .fanout()
            .to_room(
                room_id,
                ServerEvent::MessageEdited {
                    message_id,
                    room_id,
                    content,
                    edited_at: now,
                },
                None,
            )
            .await;

        Ok(())
    }

    /// Delete a message: sender only
    pub async fn delete(
        state: &GatewayState,
        conn: &Arc<Connection>,
        message_id: MessageId,
        room_id: RoomId,
    ) -> HandlerResult<()> {
        let message = state
            .messages()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if !message.is_sender(conn.user_id()) {
            return Err(DomainError::NotMessageSender.into());
        }

        state.messages().delete(message_id).await?;

        state
            .fanout()
            .to_room(
                room_id,
                ServerEvent::MessageDeleted {
                    message_id,
                    room_id,
                },
                None,
            )
            .await;

        Ok(())
    }

    /// Toggle a (user, emoji) reaction on a message
    ///
    /// The broadcast carries the message's full reaction list, so clients
    /// replace rather than merge.
    pub async fn react(
        state: &GatewayState,
        conn: &Arc<Connection>,
        message_id: MessageId,
        room_id: RoomId,
        emoji: String,
    ) -> HandlerResult<()> {
        if emoji.is_empty() {
            return Err(DomainError::Validation("emoji must not be empty".to_string()).into());
        }

        let mut message = state
            .messages()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        message.toggle_reaction(conn.user_id(), &emoji);
        state.messages().update(&message).await?;

        state
            .fanout()
            .to_room(
                room_id,
                ServerEvent::ReactionAdded {
                    message_id,
                    room_id,
                    reactions: message.reactions,
                },
                None,
            )
            .await;

        Ok(())
    }

    /// Record a read receipt; repeat receipts are quietly absorbed
    pub async fn mark_read(
        state: &GatewayState,
        conn: &Arc<Connection>,
        message_id: MessageId,
        room_id: RoomId,
    ) -> HandlerResult<()> {
        let mut message = state
            .messages()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if message.mark_read(conn.user_id()) {
            state.messages().update(&message).await?;

            state
                .fanout()
                .to_room(
                    room_id,
                    ServerEvent::MessageRead {
                        message_id,
                        room_id,
                        user_id: conn.user_id(),
                    },
                    None,
                )
                .await;
        }

        Ok(())
    }
}
