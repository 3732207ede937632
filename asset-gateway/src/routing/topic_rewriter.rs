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

//! Publish-side rewrite of a domain event into the subscriber's concrete topic.

use crate::error::{UnresolvedDelivery, UnresolvedReason};
use crate::model::DomainEvent;
use crate::routing::filter_builder::TopicBinding;
use crate::routing::topic_rules::Substitution;

/// Concrete topic and encoded payload for one subscriber.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Delivery {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Inverse of [`FilterBuilder`](crate::FilterBuilder).
///
/// Reads the same rule row the subscription was bound with, so every
/// accepted subscription shape has a rewrite.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventTopicRewriter;

impl EventTopicRewriter {
    pub fn new() -> Self {
        Self
    }

    pub fn rewrite(
        &self,
        binding: &TopicBinding,
        event: &DomainEvent,
    ) -> Result<Delivery, UnresolvedDelivery> {
        let topic = self.resolve_topic(binding, event)?;
        let payload = encode_payload(binding, event)?;
        Ok(Delivery { topic, payload })
    }

    /// Produces the concrete topic without encoding the payload.
    pub fn resolve_topic(
        &self,
        binding: &TopicBinding,
        event: &DomainEvent,
    ) -> Result<String, UnresolvedDelivery> {
        if event.kind() != binding.category().event_kind() {
            return Err(unresolved(
                binding,
                UnresolvedReason::EventKindMismatch {
                    event_kind: event.kind(),
                },
            ));
        }

        let rule = binding.rule();
        let Some(wildcard) = rule.wildcard() else {
            return Ok(binding.topic().as_str().to_string());
        };

        let replacement = match rule.substitution {
            Substitution::Concrete => return Ok(binding.topic().as_str().to_string()),
            Substitution::AssetId => event.asset_id(),
            Substitution::AttributeName => event.attribute_name().ok_or_else(|| {
                unresolved(
                    binding,
                    UnresolvedReason::EventKindMismatch {
                        event_kind: event.kind(),
                    },
                )
            })?,
        };

        Ok(binding
            .topic()
            .with_token_replaced(wildcard.position, replacement))
    }
}

fn encode_payload(binding: &TopicBinding, event: &DomainEvent) -> Result<Vec<u8>, UnresolvedDelivery> {
    let encoded = match event {
        DomainEvent::Attribute(attribute) if binding.category().is_value_only() => {
            serde_json::to_vec(attribute.value.as_ref().unwrap_or(&serde_json::Value::Null))
        }
        _ => serde_json::to_vec(event),
    };

    encoded.map_err(|err| unresolved(binding, UnresolvedReason::PayloadEncoding(err.to_string())))
}

fn unresolved(binding: &TopicBinding, reason: UnresolvedReason) -> UnresolvedDelivery {
    UnresolvedDelivery {
        topic: binding.topic().as_str().to_string(),
        reason,
    }
}
