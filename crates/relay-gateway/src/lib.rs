//! # relay-gateway
//!
//! WebSocket fan-out gateway for real-time chat events.
//!
//! The gateway authenticates connections during the HTTP upgrade, tracks
//! live sessions, room subscriptions, and typing indicators in
//! concurrency-safe registries, and fans persisted messages out to
//! subscribed connections. The durable store is an external collaborator
//! reached through the `relay-core` store traits.

pub mod broadcast;
pub mod connection;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod server;

pub use server::{create_app, create_gateway_state, run, run_server, GatewayState};
