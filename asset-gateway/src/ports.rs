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

//! Collaborators the gateway core drives but does not implement.

use crate::error::{AuthenticationError, EventBusError};
use crate::model::{DomainEvent, DomainFilter, QualityOfService, SubscriptionId};
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound delivery into the embedded broker engine.
///
/// Fire-and-forget: the engine's own queue provides backpressure.
pub trait BrokerEngine: Send + Sync {
    fn deliver(&self, session_id: &str, topic: &str, payload: Vec<u8>, qos: QualityOfService);
}

/// Receives events matched by a registered [`DomainFilter`].
#[async_trait]
pub trait EventListener: Send + Sync {
    /// A notification may carry several events for the same subscription.
    async fn on_events(&self, subscription_id: &SubscriptionId, events: Vec<DomainEvent>);
}

/// Domain event source evaluating filters on the gateway's behalf.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn register(
        &self,
        filter: DomainFilter,
        listener: Arc<dyn EventListener>,
    ) -> Result<SubscriptionId, EventBusError>;

    async fn unregister(&self, subscription_id: &SubscriptionId) -> Result<(), EventBusError>;
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerifiedIdentity {
    pub realm: String,
    pub client_id: String,
    pub roles: Vec<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, credentials: &Credentials) -> Result<VerifiedIdentity, AuthenticationError>;
}
