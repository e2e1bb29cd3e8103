//! In-process registries
//!
//! The gateway's authoritative in-memory views: which connections are
//! live, which connections subscribe to which rooms, and who is typing
//! where. All three are concurrency-safe and owned by the gateway state.

mod rooms;
mod sessions;
mod typing;

pub use rooms::RoomTracker;
pub use sessions::SessionRegistry;
pub use typing::{TypingTracker, TYPING_IDLE_EXPIRY};
