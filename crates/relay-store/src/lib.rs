//! # relay-store
//!
//! In-memory implementations of the `relay-core` store traits.
//!
//! The durable store is an external collaborator of the gateway; these
//! DashMap-backed implementations are the reference backend used by the
//! binary and the test suite. A SQL- or document-store-backed crate would
//! implement the same traits.

mod dms;
mod messages;
mod rooms;
mod users;

pub use dms::MemoryDirectMessageStore;
pub use messages::MemoryMessageStore;
pub use rooms::MemoryRoomStore;
pub use users::MemoryUserStore;
