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

//! Session registry keyed by engine session id and by client identity.

use crate::control_plane::connection::{ClientIdentity, Connection};
use crate::model::{SessionId, SubscriptionId};
use crate::observability::{events, fields};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "connection_registry";

#[derive(Clone, Debug)]
struct IdentityLease {
    session_id: SessionId,
    generation: u64,
}

/// Connections evicted while registering a new one, with why.
#[derive(Debug)]
pub struct Evicted {
    pub connection: Arc<Connection>,
    pub reason: &'static str,
}

/// Result of [`ConnectionRegistry::register`].
#[derive(Debug)]
pub struct Registration {
    pub connection: Arc<Connection>,
    pub evicted: Vec<Evicted>,
}

/// Live connections.
///
/// Each (realm, client id) holds one lease naming the session and
/// generation that currently owns it. Registering under an identity or a
/// session id that is already taken evicts the previous holder.
#[derive(Default)]
pub struct ConnectionRegistry {
    by_session: DashMap<SessionId, Arc<Connection>>,
    by_identity: DashMap<ClientIdentity, IdentityLease>,
    subscription_owners: DashMap<SubscriptionId, SessionId>,
    next_generation: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_session.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_session.is_empty()
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.by_session
            .get(session_id)
            .map(|entry| entry.value().clone())
    }

    pub fn get_by_identity(&self, identity: &ClientIdentity) -> Option<Arc<Connection>> {
        let session_id = self.by_identity.get(identity)?.session_id.clone();
        self.get(&session_id)
    }

    pub fn connections(&self) -> Vec<Arc<Connection>> {
        self.by_session
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Inserts a new connection and evicts any prior holder of its identity
    /// or session id. The caller tears the evicted connections down.
    pub fn register(
        &self,
        session_id: SessionId,
        identity: ClientIdentity,
        roles: Vec<String>,
    ) -> Registration {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let connection = Arc::new(Connection::new(
            session_id.clone(),
            identity.clone(),
            roles,
            generation,
        ));

        let mut evicted = Vec::new();
        let mut orphaned_lease = None;
        {
            let mut lease = self
                .by_identity
                .entry(identity.clone())
                .or_insert_with(|| IdentityLease {
                    session_id: session_id.clone(),
                    generation,
                });

            if lease.generation != generation {
                let prior_generation = lease.generation;
                if let Some((_, prior)) = self
                    .by_session
                    .remove_if(&lease.session_id, |_, candidate| {
                        candidate.generation() == prior_generation
                    })
                {
                    evicted.push(Evicted {
                        connection: prior,
                        reason: fields::REASON_IDENTITY_REPLACED,
                    });
                }
                *lease = IdentityLease {
                    session_id: session_id.clone(),
                    generation,
                };
            }

            if let Some(prior) = self.by_session.insert(session_id.clone(), connection.clone()) {
                if prior.identity() != &identity {
                    orphaned_lease = Some((prior.identity().clone(), prior.generation()));
                }
                evicted.push(Evicted {
                    connection: prior,
                    reason: fields::REASON_SESSION_REPLACED,
                });
            }
        }

        // Outside the identity entry guard: the prior identity may share its shard.
        if let Some((prior_identity, prior_generation)) = orphaned_lease {
            self.by_identity
                .remove_if(&prior_identity, |_, lease| lease.generation == prior_generation);
        }

        for eviction in &evicted {
            debug!(
                event = events::CONNECT_EVICT_PRIOR,
                component = COMPONENT,
                session_id = eviction.connection.session_id(),
                realm = eviction.connection.realm(),
                client_id = eviction.connection.client_id(),
                generation = eviction.connection.generation(),
                reason = eviction.reason,
                "evicted prior connection"
            );
        }

        Registration {
            connection,
            evicted,
        }
    }

    /// Removes the connection under `session_id` and releases its identity
    /// lease if it still holds it.
    pub fn remove(&self, session_id: &str) -> Option<Arc<Connection>> {
        let (_, connection) = self.by_session.remove(session_id)?;
        self.by_identity.remove_if(connection.identity(), |_, lease| {
            lease.generation == connection.generation()
        });
        Some(connection)
    }

    pub(crate) fn bind_subscription(&self, subscription_id: SubscriptionId, session_id: SessionId) {
        self.subscription_owners.insert(subscription_id, session_id);
    }

    pub(crate) fn release_subscription(&self, subscription_id: &str) -> bool {
        self.subscription_owners.remove(subscription_id).is_some()
    }

    /// Resolves the connection currently registered under the session that
    /// owns `subscription_id`.
    pub fn connection_for_subscription(&self, subscription_id: &str) -> Option<Arc<Connection>> {
        let session_id = self.subscription_owners.get(subscription_id)?.value().clone();
        self.get(&session_id)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscription_owners.len()
    }
}
