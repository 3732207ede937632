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

//! Event-bus listener that routes matched events to subscriber sessions.

use crate::control_plane::connection_registry::ConnectionRegistry;
use crate::error::{StaleSubscription, UnresolvedDelivery};
use crate::model::{DomainEvent, SubscriptionId};
use crate::observability::{events, fields};
use crate::ports::{BrokerEngine, EventListener};
use crate::routing::topic_rewriter::EventTopicRewriter;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, trace};

const COMPONENT: &str = "subscription_dispatcher";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DispatchOutcome {
    Delivered { topic: String },
    /// Connection or subscription is gone; the event is dropped.
    Stale(StaleSubscription),
    /// The event has no concrete topic for this subscription; dropped.
    Unresolved(UnresolvedDelivery),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

pub struct SubscriptionDispatcher {
    registry: Arc<ConnectionRegistry>,
    rewriter: EventTopicRewriter,
    broker: Arc<dyn BrokerEngine>,
}

impl SubscriptionDispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>, broker: Arc<dyn BrokerEngine>) -> Self {
        Self {
            registry,
            rewriter: EventTopicRewriter::new(),
            broker,
        }
    }

    /// Delivers one event matched for `subscription_id`.
    pub fn dispatch(&self, subscription_id: &SubscriptionId, event: &DomainEvent) -> DispatchOutcome {
        let Some(connection) = self.registry.connection_for_subscription(subscription_id) else {
            return self.stale(subscription_id, event, fields::REASON_CONNECTION_ABSENT);
        };

        let delivered = connection.with_subscription(subscription_id, |subscription| {
            let delivery = self.rewriter.rewrite(subscription.binding(), event)?;
            trace!(
                event = events::DISPATCH_DELIVER,
                component = COMPONENT,
                session_id = connection.session_id(),
                subscription_id = subscription_id.as_str(),
                topic = delivery.topic.as_str(),
                domain_event = %fields::format_event(event),
                "delivering event"
            );
            self.broker.deliver(
                connection.session_id(),
                &delivery.topic,
                delivery.payload,
                subscription.qos(),
            );
            Ok::<String, UnresolvedDelivery>(delivery.topic)
        });

        match delivered {
            Some(Ok(topic)) => DispatchOutcome::Delivered { topic },
            Some(Err(unresolved)) => {
                debug!(
                    event = events::DISPATCH_DROP_UNRESOLVED,
                    component = COMPONENT,
                    session_id = connection.session_id(),
                    subscription_id = subscription_id.as_str(),
                    domain_event = %fields::format_event(event),
                    err = %unresolved,
                    "dropping event without a concrete topic"
                );
                DispatchOutcome::Unresolved(unresolved)
            }
            None => self.stale(subscription_id, event, fields::REASON_SUBSCRIPTION_ABSENT),
        }
    }

    fn stale(
        &self,
        subscription_id: &SubscriptionId,
        event: &DomainEvent,
        reason: &'static str,
    ) -> DispatchOutcome {
        debug!(
            event = events::DISPATCH_DROP_STALE,
            component = COMPONENT,
            subscription_id = subscription_id.as_str(),
            domain_event = %fields::format_event(event),
            reason,
            "dropping event for stale subscription"
        );
        DispatchOutcome::Stale(StaleSubscription {
            subscription_id: subscription_id.clone(),
        })
    }
}

#[async_trait]
impl EventListener for SubscriptionDispatcher {
    async fn on_events(&self, subscription_id: &SubscriptionId, events: Vec<DomainEvent>) {
        for event in &events {
            self.dispatch(subscription_id, event);
        }
    }
}
