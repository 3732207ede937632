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

use asset_gateway::{AuthorizationDecision, Connection, Operation, Topic, TopicAuthorizer};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Returns the same decision for everything and counts consultations.
pub struct FixedAuthorizer {
    name: String,
    decision: AuthorizationDecision,
    calls: AtomicUsize,
}

impl FixedAuthorizer {
    pub fn new(name: &str, decision: AuthorizationDecision) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            decision,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TopicAuthorizer for FixedAuthorizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, _: &Connection, _: &Topic, _: Operation) -> AuthorizationDecision {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.decision
    }
}

/// Decides only for topics under a prefix, optionally only for one operation.
pub struct PrefixAuthorizer {
    name: String,
    prefix: String,
    operation: Option<Operation>,
    decision: AuthorizationDecision,
}

impl PrefixAuthorizer {
    pub fn new(
        name: &str,
        prefix: &str,
        operation: Option<Operation>,
        decision: AuthorizationDecision,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            operation,
            decision,
        })
    }
}

impl TopicAuthorizer for PrefixAuthorizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, _: &Connection, topic: &Topic, operation: Operation) -> AuthorizationDecision {
        let operation_matches = self.operation.map_or(true, |wanted| wanted == operation);
        if operation_matches && topic.as_str().starts_with(&self.prefix) {
            self.decision
        } else {
            AuthorizationDecision::NoOpinion
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedPublish {
    pub session_id: String,
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Allows topics under a prefix and keeps every publish handed to it.
pub struct RecordingAuthorizer {
    name: String,
    prefix: String,
    publishes: Mutex<Vec<RecordedPublish>>,
}

impl RecordingAuthorizer {
    pub fn new(name: &str, prefix: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            publishes: Mutex::new(Vec::new()),
        })
    }

    pub fn publishes(&self) -> Vec<RecordedPublish> {
        self.publishes.lock().clone()
    }
}

impl TopicAuthorizer for RecordingAuthorizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&self, _: &Connection, topic: &Topic, _: Operation) -> AuthorizationDecision {
        if topic.as_str().starts_with(&self.prefix) {
            AuthorizationDecision::Allow
        } else {
            AuthorizationDecision::NoOpinion
        }
    }

    fn on_publish(&self, connection: &Connection, topic: &Topic, payload: &[u8]) {
        self.publishes.lock().push(RecordedPublish {
            session_id: connection.session_id().to_string(),
            topic: topic.as_str().to_string(),
            payload: payload.to_vec(),
        });
    }
}
