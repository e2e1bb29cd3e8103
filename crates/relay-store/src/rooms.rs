//! In-memory room store

use async_trait::async_trait;
use dashmap::DashMap;

use relay_core::{Room, RoomId, RoomStore, StoreResult, UserId};

/// DashMap-backed `RoomStore`
#[derive(Debug, Default)]
pub struct MemoryRoomStore {
    rooms: DashMap<RoomId, Room>,
}

impl MemoryRoomStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a room record
    pub fn insert(&self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    /// Add a persisted member (seeding helper, idempotent)
    pub fn add_member(&self, room_id: RoomId, user_id: UserId) {
        if let Some(mut room) = self.rooms.get_mut(&room_id) {
            room.add_member(user_id);
        }
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn find_by_id(&self, id: RoomId) -> StoreResult<Option<Room>> {
        Ok(self.rooms.get(&id).map(|r| r.clone()))
    }

    async fn remove_member(&self, room_id: RoomId, user_id: UserId) -> StoreResult<()> {
        // Absent room or member is a no-op; leave must stay best-effort
        if let Some(mut room) = self.rooms.get_mut(&room_id) {
            room.remove_member(user_id);
        }
        Ok(())
    }
}
