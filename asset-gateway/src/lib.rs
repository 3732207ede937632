/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! # asset-gateway
//!
//! `asset-gateway` is the core of a publish/subscribe gateway exposing a
//! hierarchical asset/attribute event model over wildcard topics.
//!
//! Typical usage is API-first and centered on [`AssetGateway`], which the
//! embedded broker engine drives on connect, subscribe, publish and
//! disconnect. Internal modules are organized by domain layer:
//!
//! - `routing`: topic parsing, topic to [`DomainFilter`] translation and
//!   the inverse event to topic rewrite, both read from one rule table.
//! - `authorization`: the ordered [`AuthorizationChain`] and its bounded
//!   topic ownership record.
//! - `control_plane`: connections and the [`ConnectionRegistry`].
//! - `data_plane`: the [`SubscriptionDispatcher`] fed by the event bus.
//!
//! ## Topic contract
//!
//! ```
//! use asset_gateway::{AssetIdSyntax, EventKind, FilterBuilder};
//!
//! let builder = FilterBuilder::new(AssetIdSyntax::new("^ast-[0-9]+$").unwrap());
//!
//! let binding = builder.bind_str("realmA/clientX/asset/+").unwrap();
//! assert_eq!(binding.filter().event_kind, EventKind::Asset);
//! assert_eq!(binding.filter().parent_ids, vec![None]);
//!
//! let binding = builder
//!     .bind_str("realmA/clientX/attribute/+/temperature")
//!     .unwrap();
//! assert_eq!(binding.filter().attribute_names, vec!["temperature".to_string()]);
//!
//! assert!(builder.bind_str("realmA/clientX/asset/+/+").is_err());
//! ```
//!
//! ## Gateway lifecycle
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use asset_gateway::{
//!     AssetGateway, AuthenticationError, BrokerEngine, Credentials, DomainFilter,
//!     EventBus, EventBusError, EventListener, GatewayConfig, IdentityProvider,
//!     QualityOfService, SubscriptionId, VerifiedIdentity,
//! };
//!
//! # struct NoopBus;
//! #
//! # #[async_trait]
//! # impl EventBus for NoopBus {
//! #     async fn register(
//! #         &self,
//! #         _filter: DomainFilter,
//! #         _listener: Arc<dyn EventListener>,
//! #     ) -> Result<SubscriptionId, EventBusError> {
//! #         Ok("sub-1".to_string())
//! #     }
//! #     async fn unregister(&self, _id: &SubscriptionId) -> Result<(), EventBusError> {
//! #         Ok(())
//! #     }
//! # }
//! #
//! # struct NoopBroker;
//! #
//! # impl BrokerEngine for NoopBroker {
//! #     fn deliver(&self, _: &str, _: &str, _: Vec<u8>, _: QualityOfService) {}
//! # }
//! #
//! # struct TrustingProvider;
//! #
//! # #[async_trait]
//! # impl IdentityProvider for TrustingProvider {
//! #     async fn verify(
//! #         &self,
//! #         credentials: &Credentials,
//! #     ) -> Result<VerifiedIdentity, AuthenticationError> {
//! #         Ok(VerifiedIdentity {
//! #             realm: "master".to_string(),
//! #             client_id: credentials.username.clone(),
//! #             roles: Vec::new(),
//! #         })
//! #     }
//! # }
//! #
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let gateway = AssetGateway::new(
//!     GatewayConfig::default(),
//!     Arc::new(TrustingProvider),
//!     Arc::new(NoopBus),
//!     Arc::new(NoopBroker),
//! )
//! .unwrap();
//!
//! gateway
//!     .connect("session-1", "master", "client-1", &Credentials::new("client-1", "secret"))
//!     .await
//!     .unwrap();
//! let handle = gateway
//!     .subscribe("session-1", "master/client-1/asset/#", QualityOfService::AtLeastOnce)
//!     .await
//!     .unwrap();
//! assert!(handle.filter.is_unrestricted());
//!
//! assert!(gateway.unsubscribe("session-1", "master/client-1/asset/#").await.unwrap());
//! assert!(gateway.disconnect("session-1").await);
//! # });
//! ```
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events. Every event carries
//! `event` and `component` fields plus the session, topic or subscription
//! it concerns. Library code never installs a global subscriber; binaries
//! and tests initialize `tracing_subscriber` once at process boundaries.

pub mod authorization;
pub mod config;
pub mod control_plane;
pub mod data_plane;
pub mod error;
mod gateway;
pub mod model;
#[doc(hidden)]
pub mod observability;
pub mod ports;
pub mod routing;

pub use authorization::chain::{
    AuthorizationChain, AuthorizationDecision, Operation, TopicAuthorizer,
};
pub use authorization::ownership::TopicOwnership;
pub use config::{GatewayConfig, ListenConfig};
pub use control_plane::connection::{ClientIdentity, Connection, SessionSubscription};
pub use control_plane::connection_registry::ConnectionRegistry;
pub use data_plane::subscription_dispatcher::{DispatchOutcome, SubscriptionDispatcher};
pub use error::{
    AuthenticationError, AuthorizeError, ConfigError, ConnectError, EventBusError, InvalidTopic,
    InvalidTopicReason, StaleSubscription, SubscribeError, UnresolvedDelivery, UnresolvedReason,
    UnsubscribeError,
};
pub use gateway::{AssetGateway, SubscriptionHandle};
pub use model::{
    AssetEvent, AssetEventCause, AttributeEvent, DomainEvent, DomainFilter, EventKind,
    QualityOfService, SessionId, SubscriptionId,
};
pub use ports::{
    BrokerEngine, Credentials, EventBus, EventListener, IdentityProvider, VerifiedIdentity,
};
pub use routing::filter_builder::{FilterBuilder, TopicBinding};
pub use routing::topic::{Topic, Wildcard};
pub use routing::topic_rewriter::{Delivery, EventTopicRewriter};
pub use routing::topic_rules::{AssetIdSyntax, TopicCategory};
