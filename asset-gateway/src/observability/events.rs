//! Canonical structured event names used across `asset-gateway`.

// Gateway lifecycle events.
pub const GATEWAY_START: &str = "gateway_start";

// Connection lifecycle events.
pub const CONNECT_START: &str = "connect_start";
pub const CONNECT_OK: &str = "connect_ok";
pub const CONNECT_REJECTED: &str = "connect_rejected";
pub const CONNECT_EVICT_PRIOR: &str = "connect_evict_prior";
pub const DISCONNECT_OK: &str = "disconnect_ok";
pub const DISCONNECT_UNKNOWN_SESSION: &str = "disconnect_unknown_session";

// Subscription lifecycle events.
pub const SUBSCRIBE_START: &str = "subscribe_start";
pub const SUBSCRIBE_OK: &str = "subscribe_ok";
pub const SUBSCRIBE_REJECTED: &str = "subscribe_rejected";
pub const SUBSCRIBE_REPLACED: &str = "subscribe_replaced";
pub const UNSUBSCRIBE_OK: &str = "unsubscribe_ok";
pub const UNSUBSCRIBE_MISSING: &str = "unsubscribe_missing";
pub const EVENT_BUS_UNREGISTER_FAILED: &str = "event_bus_unregister_failed";

// Authorization events.
pub const AUTHORIZER_REGISTER: &str = "authorizer_register";
pub const AUTHORIZER_DEREGISTER: &str = "authorizer_deregister";
pub const AUTHORIZATION_DECIDED: &str = "authorization_decided";
pub const AUTHORIZATION_DEFERRED: &str = "authorization_deferred";
pub const TOPIC_OWNERSHIP_EVICTED: &str = "topic_ownership_evicted";
pub const PUBLISH_HANDOFF: &str = "publish_handoff";

// Dispatch events.
pub const DISPATCH_DELIVER: &str = "dispatch_deliver";
pub const DISPATCH_DROP_STALE: &str = "dispatch_drop_stale";
pub const DISPATCH_DROP_UNRESOLVED: &str = "dispatch_drop_unresolved";
