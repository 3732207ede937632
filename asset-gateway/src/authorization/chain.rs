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

//! Ordered chain of pluggable topic authorizers.

use crate::authorization::authorizer_identity::AuthorizerIdentityKey;
use crate::authorization::ownership::TopicOwnership;
use crate::control_plane::connection::Connection;
use crate::observability::events;
use crate::routing::topic::Topic;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, info};

const COMPONENT: &str = "authorization_chain";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// Subscribe.
    Read,
    /// Publish.
    Write,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Read => f.write_str("read"),
            Operation::Write => f.write_str("write"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AuthorizationDecision {
    Allow,
    Deny,
    /// Defer to the next authorizer, or to the broker's default policy.
    NoOpinion,
}

impl AuthorizationDecision {
    pub fn is_deferred(&self) -> bool {
        matches!(self, AuthorizationDecision::NoOpinion)
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow)
    }
}

impl Display for AuthorizationDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorizationDecision::Allow => f.write_str("allow"),
            AuthorizationDecision::Deny => f.write_str("deny"),
            AuthorizationDecision::NoOpinion => f.write_str("no_opinion"),
        }
    }
}

/// A pluggable unit deciding allow, deny or defer for one topic operation.
///
/// Decisions must not block; they run on connection-handling threads.
pub trait TopicAuthorizer: Send + Sync {
    fn name(&self) -> &str;

    fn decide(
        &self,
        connection: &Connection,
        topic: &Topic,
        operation: Operation,
    ) -> AuthorizationDecision;

    /// Receives allowed publishes on topics this authorizer owns.
    fn on_publish(&self, _connection: &Connection, _topic: &Topic, _payload: &[u8]) {}
}

/// Authorizers consulted in registration order.
///
/// Every request walks the chain from the start. The first non-deferring
/// authorizer wins and becomes the topic's owner, which only selects the
/// handler for allowed publishes.
pub struct AuthorizationChain {
    authorizers: ArcSwap<Vec<AuthorizerIdentityKey>>,
    ownership: TopicOwnership,
    registration: Mutex<()>,
}

impl AuthorizationChain {
    pub fn new(ownership_capacity: usize) -> Self {
        Self {
            authorizers: ArcSwap::from_pointee(Vec::new()),
            ownership: TopicOwnership::new(ownership_capacity),
            registration: Mutex::new(()),
        }
    }

    pub fn ownership(&self) -> &TopicOwnership {
        &self.ownership
    }

    pub fn len(&self) -> usize {
        self.authorizers.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.authorizers.load().is_empty()
    }

    /// Registered authorizers in consultation order.
    pub fn authorizers(&self) -> Vec<Arc<dyn TopicAuthorizer>> {
        self.authorizers
            .load()
            .iter()
            .map(|key| key.authorizer().clone())
            .collect()
    }

    /// Appends an authorizer. Returns `false` if it is already registered.
    pub fn register(&self, authorizer: Arc<dyn TopicAuthorizer>) -> bool {
        let _registration = self.registration.lock();
        let key = AuthorizerIdentityKey::new(authorizer);
        let current = self.authorizers.load();
        if current.contains(&key) {
            return false;
        }

        let mut next: Vec<AuthorizerIdentityKey> = current.iter().cloned().collect();
        next.push(key.clone());
        self.authorizers.store(Arc::new(next));

        info!(
            event = events::AUTHORIZER_REGISTER,
            component = COMPONENT,
            authorizer = key.name(),
            position = current.len(),
            "registered authorizer"
        );
        true
    }

    /// Removes an authorizer and every topic it owns.
    pub fn deregister(&self, authorizer: &Arc<dyn TopicAuthorizer>) -> bool {
        let _registration = self.registration.lock();
        let key = AuthorizerIdentityKey::new(authorizer.clone());
        let current = self.authorizers.load();
        if !current.contains(&key) {
            return false;
        }

        let next: Vec<AuthorizerIdentityKey> = current
            .iter()
            .filter(|candidate| **candidate != key)
            .cloned()
            .collect();
        self.authorizers.store(Arc::new(next));
        let released = self.ownership.release_owner(&key);

        info!(
            event = events::AUTHORIZER_DEREGISTER,
            component = COMPONENT,
            authorizer = key.name(),
            released_topics = released,
            "deregistered authorizer"
        );
        true
    }

    /// The authorizer that last decided `topic`, if still recorded.
    pub fn owner_of(&self, topic: &str) -> Option<Arc<dyn TopicAuthorizer>> {
        self.ownership.owner_of(topic)
    }

    pub fn authorize(
        &self,
        connection: &Connection,
        topic: &Topic,
        operation: Operation,
    ) -> AuthorizationDecision {
        let authorizers = self.authorizers.load();
        for candidate in authorizers.iter() {
            let decision = candidate.authorizer().decide(connection, topic, operation);
            if decision.is_deferred() {
                continue;
            }

            self.record_owner(topic, candidate);
            debug!(
                event = events::AUTHORIZATION_DECIDED,
                component = COMPONENT,
                session_id = connection.session_id(),
                topic = topic.as_str(),
                authorizer = candidate.name(),
                operation = %operation,
                decision = %decision,
                "authorizer decided"
            );
            return decision;
        }

        debug!(
            event = events::AUTHORIZATION_DEFERRED,
            component = COMPONENT,
            session_id = connection.session_id(),
            topic = topic.as_str(),
            operation = %operation,
            authorizers = authorizers.len(),
            "every authorizer deferred"
        );
        AuthorizationDecision::NoOpinion
    }

    fn record_owner(&self, topic: &Topic, owner: &AuthorizerIdentityKey) {
        self.ownership.claim(topic.as_str(), owner.clone());

        // A concurrent deregister may have purged before this claim landed.
        if !self.authorizers.load().contains(owner) {
            self.ownership
                .release_topic_if_owned_by(topic.as_str(), owner);
        }
    }
}

impl Default for AuthorizationChain {
    fn default() -> Self {
        Self::new(crate::authorization::ownership::DEFAULT_OWNERSHIP_CAPACITY)
    }
}
