//! Store traits (ports) - the gateway's view of the durable store
//!
//! The durable store is an external collaborator: the gateway persists and
//! retrieves records through these traits and assumes the store serializes
//! its own writes. The domain layer defines what it needs; an infrastructure
//! crate provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{DirectMessage, Message, PresenceStatus, Room, User};
use crate::error::DomainError;
use crate::value_objects::{MessageId, RoomId, UserId};

/// Result type for store operations
pub type StoreResult<T> = Result<T, DomainError>;

// ============================================================================
// User Store
// ============================================================================

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Persist a presence change (status + last-seen timestamp)
    async fn update_presence(
        &self,
        id: UserId,
        status: PresenceStatus,
        last_seen: DateTime<Utc>,
    ) -> StoreResult<()>;
}

// ============================================================================
// Room Store
// ============================================================================

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: RoomId) -> StoreResult<Option<Room>>;

    /// Remove a user from the room's persisted member set (no-op if absent)
    async fn remove_member(&self, room_id: RoomId, user_id: UserId) -> StoreResult<()>;
}

// ============================================================================
// Message Store
// ============================================================================

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: MessageId) -> StoreResult<Option<Message>>;

    /// Persist a new message
    async fn create(&self, message: &Message) -> StoreResult<()>;

    /// Persist a mutated message (edit, reaction toggle, read-by update)
    async fn update(&self, message: &Message) -> StoreResult<()>;

    /// Delete a message
    async fn delete(&self, id: MessageId) -> StoreResult<()>;
}

// ============================================================================
// Direct Message Store
// ============================================================================

#[async_trait]
pub trait DirectMessageStore: Send + Sync {
    /// Persist a new direct message
    async fn create(&self, message: &DirectMessage) -> StoreResult<()>;

    /// List a conversation's messages, oldest first, identified by the
    /// unordered participant pair
    async fn find_conversation(
        &self,
        a: UserId,
        b: UserId,
        limit: usize,
    ) -> StoreResult<Vec<DirectMessage>>;
}
