//! In-memory direct message store

use async_trait::async_trait;
use dashmap::DashMap;

use relay_core::{DirectMessage, DirectMessageStore, StoreResult, UserId};

/// DashMap-backed `DirectMessageStore`
///
/// Conversations are keyed by the canonical unordered participant pair.
#[derive(Debug, Default)]
pub struct MemoryDirectMessageStore {
    conversations: DashMap<(UserId, UserId), Vec<DirectMessage>>,
}

impl MemoryDirectMessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations
    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }
}

#[async_trait]
impl DirectMessageStore for MemoryDirectMessageStore {
    async fn create(&self, message: &DirectMessage) -> StoreResult<()> {
        let key =
            DirectMessage::conversation_key(message.participants[0], message.participants[1]);
        self.conversations
            .entry(key)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn find_conversation(
        &self,
        a: UserId,
        b: UserId,
        limit: usize,
    ) -> StoreResult<Vec<DirectMessage>> {
        let key = DirectMessage::conversation_key(a, b);
        Ok(self
            .conversations
            .get(&key)
            .map(|msgs| {
                // Most recent `limit` messages, oldest first
                let skip = msgs.len().saturating_sub(limit);
                msgs[skip..].to_vec()
            })
            .unwrap_or_default())
    }
}
