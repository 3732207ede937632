//! Control-plane layer.
//!
//! Owns connection lifecycle: session and identity registration, eviction of
//! superseded sessions, and each connection's subscription table. Data-plane
//! dispatch only reads this state.

pub mod connection;
pub mod connection_registry;
