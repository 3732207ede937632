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

//! Asset/attribute domain model exchanged with the event bus and broker engine.

use serde::{Deserialize, Serialize};

/// Opaque session identifier assigned by the broker engine.
pub type SessionId = String;

/// Subscription identifier assigned by the event bus on registration.
pub type SubscriptionId = String;

/// Delivery guarantee requested by a subscriber and passed through on delivery.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityOfService {
    #[default]
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

/// Which family of domain events a filter selects.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Asset,
    Attribute,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetEventCause {
    Create,
    Read,
    Update,
    Delete,
}

/// Asset-level change notification.
///
/// `path` lists asset ids from the root down to and including the asset itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEvent {
    pub realm: String,
    pub asset_id: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub path: Vec<String>,
    pub cause: AssetEventCause,
}

/// Attribute value change on a single asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeEvent {
    pub realm: String,
    pub asset_id: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub path: Vec<String>,
    pub attribute_name: String,
    pub value: Option<serde_json::Value>,
}

/// Domain event envelope as delivered by the event bus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "kebab-case")]
pub enum DomainEvent {
    Asset(AssetEvent),
    Attribute(AttributeEvent),
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::Asset(_) => EventKind::Asset,
            DomainEvent::Attribute(_) => EventKind::Attribute,
        }
    }

    pub fn realm(&self) -> &str {
        match self {
            DomainEvent::Asset(event) => &event.realm,
            DomainEvent::Attribute(event) => &event.realm,
        }
    }

    pub fn asset_id(&self) -> &str {
        match self {
            DomainEvent::Asset(event) => &event.asset_id,
            DomainEvent::Attribute(event) => &event.asset_id,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            DomainEvent::Asset(event) => event.parent_id.as_deref(),
            DomainEvent::Attribute(event) => event.parent_id.as_deref(),
        }
    }

    pub fn path(&self) -> &[String] {
        match self {
            DomainEvent::Asset(event) => &event.path,
            DomainEvent::Attribute(event) => &event.path,
        }
    }

    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            DomainEvent::Asset(_) => None,
            DomainEvent::Attribute(event) => Some(&event.attribute_name),
        }
    }
}

/// Query descriptor selecting domain events for one subscription.
///
/// Empty dimensions place no restriction. A `None` entry in `parent_ids`
/// selects root-level assets.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainFilter {
    pub realm: String,
    pub event_kind: EventKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_ids: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribute_names: Vec<String>,
}

impl DomainFilter {
    /// Creates a filter restricted only by realm and event kind.
    pub fn new(realm: impl Into<String>, event_kind: EventKind) -> Self {
        Self {
            realm: realm.into(),
            event_kind,
            asset_ids: Vec::new(),
            parent_ids: Vec::new(),
            paths: Vec::new(),
            attribute_names: Vec::new(),
        }
    }

    /// True when no dimension beyond realm and kind narrows the selection.
    pub fn is_unrestricted(&self) -> bool {
        self.asset_ids.is_empty()
            && self.parent_ids.is_empty()
            && self.paths.is_empty()
            && self.attribute_names.is_empty()
    }

    /// Evaluates the filter against one event.
    pub fn matches(&self, event: &DomainEvent) -> bool {
        if event.realm() != self.realm || event.kind() != self.event_kind {
            return false;
        }

        let asset_id = event.asset_id();

        if !self.asset_ids.is_empty() && !self.asset_ids.iter().any(|id| id == asset_id) {
            return false;
        }

        if !self.parent_ids.is_empty()
            && !self
                .parent_ids
                .iter()
                .any(|parent| parent.as_deref() == event.parent_id())
        {
            return false;
        }

        if !self.paths.is_empty()
            && !self.paths.iter().any(|ancestor| {
                ancestor != asset_id && event.path().iter().any(|segment| segment == ancestor)
            })
        {
            return false;
        }

        if !self.attribute_names.is_empty() {
            match event.attribute_name() {
                Some(name) => {
                    if !self.attribute_names.iter().any(|wanted| wanted == name) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }
}
