//! Wire protocol - inbound events
//!
//! Defines the client-to-gateway message envelope and its payloads.

mod client;

pub use client::ClientEvent;
