//! In-memory user store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use relay_core::{DomainError, PresenceStatus, StoreResult, User, UserId, UserStore};

/// DashMap-backed `UserStore`
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<UserId, User>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user record
    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn update_presence(
        &self,
        id: UserId,
        status: PresenceStatus,
        last_seen: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.status = status;
        user.last_seen = last_seen;
        Ok(())
    }
}
