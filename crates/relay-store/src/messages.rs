//! In-memory message store

use async_trait::async_trait;
use dashmap::DashMap;

use relay_core::{DomainError, Message, MessageId, MessageStore, StoreResult};

/// DashMap-backed `MessageStore`
///
/// DashMap serializes access per entry, which is what gives the edit-window
/// and reaction-toggle checks their race freedom in this backend.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    messages: DashMap<MessageId, Message>,
}

impl MemoryMessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn find_by_id(&self, id: MessageId) -> StoreResult<Option<Message>> {
        Ok(self.messages.get(&id).map(|m| m.clone()))
    }

    async fn create(&self, message: &Message) -> StoreResult<()> {
        self.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn update(&self, message: &Message) -> StoreResult<()> {
        if !self.messages.contains_key(&message.id) {
            return Err(DomainError::MessageNotFound(message.id));
        }
        self.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn delete(&self, id: MessageId) -> StoreResult<()> {
        self.messages
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::MessageNotFound(id))
    }
}
