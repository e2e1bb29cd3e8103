//! Domain entities

mod direct_message;
mod message;
mod reaction;
mod room;
mod user;

pub use direct_message::DirectMessage;
pub use message::{Message, MessageKind, ReactionChange, CONTENT_MAX_CHARS, EDIT_WINDOW};
pub use reaction::Reaction;
pub use room::{Room, RoomVisibility};
pub use user::{PresenceStatus, User};
