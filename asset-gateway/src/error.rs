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

//! Failure types surfaced by the gateway facade and its collaborators.

use crate::model::{EventKind, SessionId, SubscriptionId};
use thiserror::Error;

/// Why a topic string has no domain interpretation.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum InvalidTopicReason {
    #[error("topic is empty")]
    Empty,
    #[error("topic has {0} tokens, at least 4 are required")]
    TooFewTokens(usize),
    #[error("wildcard at position {0} shares a level with other characters")]
    MalformedWildcard(usize),
    #[error("multi-level wildcard at position {0} is not the final token")]
    MultiLevelWildcardNotLast(usize),
    #[error("only one wildcard per topic is supported")]
    MultipleWildcards,
    #[error("category '{0}' is not filterable")]
    UnsupportedCategory(String),
    #[error("topic shape has no domain interpretation")]
    UnsupportedShape,
}

/// The topic does not match any recognised shape.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid topic '{topic}': {reason}")]
pub struct InvalidTopic {
    pub topic: String,
    pub reason: InvalidTopicReason,
}

impl InvalidTopic {
    pub(crate) fn new(topic: impl Into<String>, reason: InvalidTopicReason) -> Self {
        Self {
            topic: topic.into(),
            reason,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum UnresolvedReason {
    #[error("{event_kind:?} event cannot be published on this topic category")]
    EventKindMismatch { event_kind: EventKind },
    #[error("payload encoding failed: {0}")]
    PayloadEncoding(String),
}

/// An event could not be rewritten into a concrete topic for one subscriber.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unable to resolve delivery for topic '{topic}': {reason}")]
pub struct UnresolvedDelivery {
    pub topic: String,
    pub reason: UnresolvedReason,
}

/// Dispatch resolved a subscription to a connection that no longer holds it.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("subscription '{subscription_id}' has no live connection")]
pub struct StaleSubscription {
    pub subscription_id: SubscriptionId,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AuthenticationError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EventBusError {
    #[error("event bus rejected the filter: {0}")]
    Rejected(String),
    #[error("subscription '{0}' is not registered")]
    UnknownSubscription(SubscriptionId),
    #[error("event bus unavailable: {0}")]
    Unavailable(String),
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConnectError {
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthenticationError),
    #[error("verified identity '{verified_realm}/{verified_client_id}' does not match requested '{realm}/{client_id}'")]
    IdentityMismatch {
        realm: String,
        client_id: String,
        verified_realm: String,
        verified_client_id: String,
    },
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SubscribeError {
    #[error("unknown session '{0}'")]
    UnknownSession(SessionId),
    #[error(transparent)]
    InvalidTopic(#[from] InvalidTopic),
    #[error("topic realm '{topic_realm}' does not match connection realm '{connection_realm}'")]
    RealmMismatch {
        topic_realm: String,
        connection_realm: String,
    },
    #[error("subscription to '{0}' denied by authorizer")]
    Denied(String),
    #[error("connection already holds {0} subscriptions")]
    TooManySubscriptions(usize),
    #[error("session '{0}' closed while subscribing")]
    SessionClosed(SessionId),
    #[error("event bus registration failed: {0}")]
    EventBus(#[from] EventBusError),
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum UnsubscribeError {
    #[error("unknown session '{0}'")]
    UnknownSession(SessionId),
    #[error("event bus unregistration failed: {0}")]
    EventBus(#[from] EventBusError),
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AuthorizeError {
    #[error("unknown session '{0}'")]
    UnknownSession(SessionId),
    #[error(transparent)]
    InvalidTopic(#[from] InvalidTopic),
    #[error("cannot publish to wildcard topic '{0}'")]
    WildcardPublish(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("invalid asset id pattern: {0}")]
    AssetIdPattern(#[from] regex::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
