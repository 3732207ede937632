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

//! Per-session connection state and its subscription table.

use crate::error::SubscribeError;
use crate::model::{DomainFilter, QualityOfService, SessionId, SubscriptionId};
use crate::routing::filter_builder::TopicBinding;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Realm and client id pair a session authenticated as.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ClientIdentity {
    pub realm: String,
    pub client_id: String,
}

impl ClientIdentity {
    pub fn new(realm: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            client_id: client_id.into(),
        }
    }
}

/// One live subscription of a connection.
#[derive(Clone, Debug)]
pub struct SessionSubscription {
    id: SubscriptionId,
    binding: TopicBinding,
    qos: QualityOfService,
}

impl SessionSubscription {
    pub fn new(id: SubscriptionId, binding: TopicBinding, qos: QualityOfService) -> Self {
        Self { id, binding, qos }
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub fn topic(&self) -> &str {
        self.binding.topic().as_str()
    }

    pub fn binding(&self) -> &TopicBinding {
        &self.binding
    }

    pub fn filter(&self) -> &DomainFilter {
        self.binding.filter()
    }

    pub fn qos(&self) -> QualityOfService {
        self.qos
    }
}

#[derive(Default)]
struct SubscriptionTable {
    closed: bool,
    entries: HashMap<SubscriptionId, Arc<SessionSubscription>>,
    by_topic: HashMap<String, SubscriptionId>,
}

impl SubscriptionTable {
    fn remove(&mut self, subscription_id: &str) -> Option<Arc<SessionSubscription>> {
        let removed = self.entries.remove(subscription_id)?;
        if self.by_topic.get(removed.topic()) == Some(&removed.id) {
            self.by_topic.remove(removed.topic());
        }
        Some(removed)
    }
}

/// One authenticated session.
///
/// Dispatch reads the subscription table under a shared lock for the whole
/// delivery, and [`Connection::close`] takes it exclusively, so once close
/// returns no further delivery reaches this session.
pub struct Connection {
    session_id: SessionId,
    identity: ClientIdentity,
    roles: Vec<String>,
    generation: u64,
    subscriptions: RwLock<SubscriptionTable>,
}

impl Connection {
    pub fn new(
        session_id: SessionId,
        identity: ClientIdentity,
        roles: Vec<String>,
        generation: u64,
    ) -> Self {
        Self {
            session_id,
            identity,
            roles,
            generation,
            subscriptions: RwLock::new(SubscriptionTable::default()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn realm(&self) -> &str {
        &self.identity.realm
    }

    pub fn client_id(&self) -> &str {
        &self.identity.client_id
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|candidate| candidate == role)
    }

    /// Registry-assigned counter distinguishing reconnects of one identity.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_closed(&self) -> bool {
        self.subscriptions.read().closed
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().entries.len()
    }

    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.subscriptions.read().entries.keys().cloned().collect()
    }

    pub fn subscription(&self, subscription_id: &str) -> Option<Arc<SessionSubscription>> {
        self.subscriptions.read().entries.get(subscription_id).cloned()
    }

    pub fn subscription_for_topic(&self, topic: &str) -> Option<Arc<SessionSubscription>> {
        let table = self.subscriptions.read();
        table
            .by_topic
            .get(topic)
            .and_then(|id| table.entries.get(id))
            .cloned()
    }

    /// Fails fast before the event bus is involved.
    pub(crate) fn check_capacity(&self, topic: &str, limit: usize) -> Result<(), SubscribeError> {
        let table = self.subscriptions.read();
        if table.closed {
            return Err(SubscribeError::SessionClosed(self.session_id.clone()));
        }
        if !table.by_topic.contains_key(topic) && table.entries.len() >= limit {
            return Err(SubscribeError::TooManySubscriptions(limit));
        }
        Ok(())
    }

    /// Adds a subscription, replacing any existing one for the same topic.
    ///
    /// Returns the replaced subscription.
    pub(crate) fn insert_subscription(
        &self,
        subscription: SessionSubscription,
        limit: usize,
    ) -> Result<Option<Arc<SessionSubscription>>, SubscribeError> {
        let mut table = self.subscriptions.write();
        if table.closed {
            return Err(SubscribeError::SessionClosed(self.session_id.clone()));
        }

        let topic = subscription.topic().to_string();
        let previous = table.by_topic.get(&topic).cloned();
        if previous.is_none() && table.entries.len() >= limit {
            return Err(SubscribeError::TooManySubscriptions(limit));
        }

        let replaced = previous.and_then(|id| table.remove(&id));
        table.by_topic.insert(topic, subscription.id.clone());
        table
            .entries
            .insert(subscription.id.clone(), Arc::new(subscription));
        Ok(replaced)
    }

    pub(crate) fn remove_subscription_for_topic(
        &self,
        topic: &str,
    ) -> Option<Arc<SessionSubscription>> {
        let mut table = self.subscriptions.write();
        let id = table.by_topic.get(topic).cloned()?;
        table.remove(&id)
    }

    /// Runs `deliver` against one subscription while holding the table's
    /// shared lock. `None` when the subscription is gone.
    pub(crate) fn with_subscription<R>(
        &self,
        subscription_id: &str,
        deliver: impl FnOnce(&SessionSubscription) -> R,
    ) -> Option<R> {
        let table = self.subscriptions.read();
        table
            .entries
            .get(subscription_id)
            .map(|subscription| deliver(subscription.as_ref()))
    }

    /// Marks the connection closed and hands back every subscription it held.
    pub(crate) fn close(&self) -> Vec<Arc<SessionSubscription>> {
        let mut table = self.subscriptions.write();
        table.closed = true;
        table.by_topic.clear();
        table.entries.drain().map(|(_, subscription)| subscription).collect()
    }
}

impl Debug for Connection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("identity", &self.identity)
            .field("generation", &self.generation)
            .field("subscriptions", &self.subscription_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientIdentity, Connection, SessionSubscription};
    use crate::error::SubscribeError;
    use crate::model::QualityOfService;
    use crate::routing::filter_builder::FilterBuilder;
    use crate::routing::topic_rules::AssetIdSyntax;

    fn subscription(id: &str, topic: &str) -> SessionSubscription {
        let builder = FilterBuilder::new(AssetIdSyntax::new("^ast-[0-9a-z]+$").unwrap());
        SessionSubscription::new(
            id.to_string(),
            builder.bind_str(topic).unwrap(),
            QualityOfService::AtLeastOnce,
        )
    }

    fn connection() -> Connection {
        Connection::new(
            "session-1".to_string(),
            ClientIdentity::new("realmA", "clientX"),
            vec!["read:assets".to_string()],
            1,
        )
    }

    #[test]
    fn same_topic_replaces_previous_subscription() {
        let connection = connection();
        let first = connection
            .insert_subscription(subscription("sub-1", "realmA/clientX/asset/#"), 10)
            .unwrap();
        assert!(first.is_none());

        let replaced = connection
            .insert_subscription(subscription("sub-2", "realmA/clientX/asset/#"), 10)
            .unwrap()
            .expect("previous subscription should be replaced");

        assert_eq!(replaced.id(), "sub-1");
        assert_eq!(connection.subscription_ids(), vec!["sub-2".to_string()]);
        assert_eq!(
            connection
                .subscription_for_topic("realmA/clientX/asset/#")
                .unwrap()
                .id(),
            "sub-2"
        );
    }

    #[test]
    fn limit_counts_distinct_topics() {
        let connection = connection();
        connection
            .insert_subscription(subscription("sub-1", "realmA/clientX/asset/#"), 1)
            .unwrap();

        let err = connection
            .insert_subscription(subscription("sub-2", "realmA/clientX/asset/+"), 1)
            .unwrap_err();
        assert_eq!(err, SubscribeError::TooManySubscriptions(1));

        assert!(connection
            .insert_subscription(subscription("sub-3", "realmA/clientX/asset/#"), 1)
            .is_ok());
        assert!(connection.check_capacity("realmA/clientX/asset/+", 1).is_err());
    }

    #[test]
    fn close_drains_and_rejects_new_subscriptions() {
        let connection = connection();
        connection
            .insert_subscription(subscription("sub-1", "realmA/clientX/asset/#"), 10)
            .unwrap();

        let drained = connection.close();
        assert_eq!(drained.len(), 1);
        assert!(connection.is_closed());
        assert!(connection.with_subscription("sub-1", |_| ()).is_none());

        let err = connection
            .insert_subscription(subscription("sub-2", "realmA/clientX/asset/+"), 10)
            .unwrap_err();
        assert_eq!(err, SubscribeError::SessionClosed("session-1".to_string()));
    }

    #[test]
    fn remove_by_topic_clears_both_indexes() {
        let connection = connection();
        connection
            .insert_subscription(subscription("sub-1", "realmA/clientX/asset/#"), 10)
            .unwrap();

        let removed = connection
            .remove_subscription_for_topic("realmA/clientX/asset/#")
            .unwrap();
        assert_eq!(removed.id(), "sub-1");
        assert_eq!(connection.subscription_count(), 0);
        assert!(connection.subscription("sub-1").is_none());
        assert!(connection.has_role("read:assets"));
    }
}
