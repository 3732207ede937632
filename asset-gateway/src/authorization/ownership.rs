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

//! Bounded record of which authorizer last decided each topic.

use crate::authorization::authorizer_identity::AuthorizerIdentityKey;
use crate::authorization::chain::TopicAuthorizer;
use crate::observability::events;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "topic_ownership";

/// Default bound on the number of owned topics.
pub const DEFAULT_OWNERSHIP_CAPACITY: usize = 10_000;

#[derive(Clone, Debug)]
struct OwnershipEntry {
    owner: AuthorizerIdentityKey,
    sequence: u64,
}

/// Claim order; entries whose sequence no longer matches the map are stale.
#[derive(Default)]
struct ClaimLog {
    next_sequence: u64,
    order: VecDeque<(u64, String)>,
}

/// Topic string to owning authorizer.
///
/// Reads go straight to the concurrent map. Writes are serialized through the
/// claim log so eviction always removes the least recently claimed topic.
pub struct TopicOwnership {
    entries: DashMap<String, OwnershipEntry>,
    claims: Mutex<ClaimLog>,
    capacity: usize,
}

impl TopicOwnership {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            claims: Mutex::new(ClaimLog::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn owner_of(&self, topic: &str) -> Option<Arc<dyn TopicAuthorizer>> {
        self.owner_key_of(topic).map(|key| key.authorizer().clone())
    }

    pub(crate) fn owner_key_of(&self, topic: &str) -> Option<AuthorizerIdentityKey> {
        self.entries.get(topic).map(|entry| entry.owner.clone())
    }

    /// Records `owner` for `topic`, replacing any prior owner.
    ///
    /// Returns the topics evicted to stay within capacity.
    pub(crate) fn claim(&self, topic: &str, owner: AuthorizerIdentityKey) -> Vec<String> {
        let mut claims = self.claims.lock();
        let sequence = claims.next_sequence;
        claims.next_sequence += 1;

        self.entries
            .insert(topic.to_string(), OwnershipEntry { owner, sequence });
        claims.order.push_back((sequence, topic.to_string()));

        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            let Some((oldest, candidate)) = claims.order.pop_front() else {
                break;
            };
            if self
                .entries
                .remove_if(&candidate, |_, entry| entry.sequence == oldest)
                .is_some()
            {
                debug!(
                    event = events::TOPIC_OWNERSHIP_EVICTED,
                    component = COMPONENT,
                    topic = candidate.as_str(),
                    capacity = self.capacity,
                    "evicted oldest topic owner"
                );
                evicted.push(candidate);
            }
        }

        if claims.order.len() > self.capacity.saturating_mul(2) {
            let entries = &self.entries;
            claims.order.retain(|(sequence, topic)| {
                entries
                    .get(topic)
                    .is_some_and(|entry| entry.sequence == *sequence)
            });
        }

        evicted
    }

    /// Drops every topic owned by `owner`. Returns how many were removed.
    pub(crate) fn release_owner(&self, owner: &AuthorizerIdentityKey) -> usize {
        let _claims = self.claims.lock();
        let before = self.entries.len();
        self.entries.retain(|_, entry| &entry.owner != owner);
        before - self.entries.len()
    }

    /// Drops `topic` only if it is still owned by `owner`.
    pub(crate) fn release_topic_if_owned_by(&self, topic: &str, owner: &AuthorizerIdentityKey) -> bool {
        let _claims = self.claims.lock();
        self.entries
            .remove_if(topic, |_, entry| &entry.owner == owner)
            .is_some()
    }

    pub fn forget(&self, topic: &str) -> bool {
        let _claims = self.claims.lock();
        self.entries.remove(topic).is_some()
    }
}

impl Default for TopicOwnership {
    fn default() -> Self {
        Self::new(DEFAULT_OWNERSHIP_CAPACITY)
    }
}

impl std::fmt::Debug for TopicOwnership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicOwnership")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
