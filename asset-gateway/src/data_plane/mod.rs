//! Data-plane layer.
//!
//! Turns event-bus notifications into broker deliveries: resolves the owning
//! connection and subscription, rewrites the topic and hands the payload to
//! the broker engine. Nothing here mutates connection state.

pub mod subscription_dispatcher;
