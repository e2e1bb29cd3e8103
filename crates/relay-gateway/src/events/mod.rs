//! Wire protocol - outbound events
//!
//! Defines the gateway-to-client message envelope and its payloads.

mod server;

pub use server::ServerEvent;
