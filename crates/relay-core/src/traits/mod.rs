//! Store traits (ports) - define the interface for the durable store

mod stores;

pub use stores::{DirectMessageStore, MessageStore, RoomStore, StoreResult, UserStore};
