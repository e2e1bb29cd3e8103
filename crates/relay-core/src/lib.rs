//! # relay-core
//!
//! Domain layer containing entities, value objects, store traits, and domain errors.
//! This crate has zero dependencies on infrastructure (transport, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    DirectMessage, Message, MessageKind, PresenceStatus, Reaction, ReactionChange, Room,
    RoomVisibility, User, CONTENT_MAX_CHARS, EDIT_WINDOW,
};
pub use error::DomainError;
pub use traits::{DirectMessageStore, MessageStore, RoomStore, StoreResult, UserStore};
pub use value_objects::{MessageId, RoomId, UserId};
