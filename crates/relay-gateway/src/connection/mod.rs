//! WebSocket connection state

mod connection;

pub use connection::{Connection, OUTBOUND_BUFFER_SIZE};
