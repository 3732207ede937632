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

use asset_gateway::{DomainEvent, DomainFilter, EventBus, EventBusError, EventListener, SubscriptionId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

struct Registration {
    filter: DomainFilter,
    listener: Arc<dyn EventListener>,
}

/// Event bus evaluating [`DomainFilter::matches`] in process.
#[derive(Default)]
pub struct InMemoryEventBus {
    registrations: RwLock<HashMap<SubscriptionId, Registration>>,
    unregister_calls: AtomicUsize,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.read().len()
    }

    pub fn is_registered(&self, subscription_id: &str) -> bool {
        self.registrations.read().contains_key(subscription_id)
    }

    pub fn filter_of(&self, subscription_id: &str) -> Option<DomainFilter> {
        self.registrations
            .read()
            .get(subscription_id)
            .map(|registration| registration.filter.clone())
    }

    pub fn unregister_calls(&self) -> usize {
        self.unregister_calls.load(Ordering::SeqCst)
    }

    /// Notifies every registration whose filter matches. Returns how many.
    pub async fn publish(&self, event: DomainEvent) -> usize {
        self.publish_batch(vec![event]).await
    }

    /// Groups matching events per registration into one notification each.
    pub async fn publish_batch(&self, events: Vec<DomainEvent>) -> usize {
        let matched: Vec<(SubscriptionId, Arc<dyn EventListener>, Vec<DomainEvent>)> = {
            let registrations = self.registrations.read();
            registrations
                .iter()
                .filter_map(|(subscription_id, registration)| {
                    let selected: Vec<DomainEvent> = events
                        .iter()
                        .filter(|event| registration.filter.matches(event))
                        .cloned()
                        .collect();
                    (!selected.is_empty()).then(|| {
                        (
                            subscription_id.clone(),
                            registration.listener.clone(),
                            selected,
                        )
                    })
                })
                .collect()
        };

        let notified = matched.len();
        for (subscription_id, listener, selected) in matched {
            listener.on_events(&subscription_id, selected).await;
        }
        notified
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn register(
        &self,
        filter: DomainFilter,
        listener: Arc<dyn EventListener>,
    ) -> Result<SubscriptionId, EventBusError> {
        let subscription_id = Uuid::new_v4().to_string();
        debug!(subscription_id = subscription_id.as_str(), "registering filter");
        self.registrations
            .write()
            .insert(subscription_id.clone(), Registration { filter, listener });
        Ok(subscription_id)
    }

    async fn unregister(&self, subscription_id: &SubscriptionId) -> Result<(), EventBusError> {
        self.unregister_calls.fetch_add(1, Ordering::SeqCst);
        self.registrations
            .write()
            .remove(subscription_id)
            .map(|_| ())
            .ok_or_else(|| EventBusError::UnknownSubscription(subscription_id.clone()))
    }
}

/// Event bus that refuses every registration.
#[derive(Default)]
pub struct FailingEventBus;

#[async_trait]
impl EventBus for FailingEventBus {
    async fn register(
        &self,
        _filter: DomainFilter,
        _listener: Arc<dyn EventListener>,
    ) -> Result<SubscriptionId, EventBusError> {
        Err(EventBusError::Unavailable("event bus offline".to_string()))
    }

    async fn unregister(&self, subscription_id: &SubscriptionId) -> Result<(), EventBusError> {
        Err(EventBusError::UnknownSubscription(subscription_id.clone()))
    }
}
