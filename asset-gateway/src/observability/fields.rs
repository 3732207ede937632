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

//! Canonical structured field keys and value-format helpers.

use crate::model::{DomainEvent, DomainFilter};

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const SESSION_ID: &str = "session_id";
pub const REALM: &str = "realm";
pub const CLIENT_ID: &str = "client_id";
pub const TOPIC: &str = "topic";
pub const SUBSCRIPTION_ID: &str = "subscription_id";
pub const AUTHORIZER: &str = "authorizer";
pub const OPERATION: &str = "operation";
pub const DECISION: &str = "decision";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const REASON_SESSION_REPLACED: &str = "session_replaced";
pub const REASON_IDENTITY_REPLACED: &str = "identity_replaced";
pub const REASON_CONNECTION_ABSENT: &str = "connection_absent";
pub const REASON_SUBSCRIPTION_ABSENT: &str = "subscription_absent";

/// Compact `kind:realm/asset[/attribute]` rendering of an event for log lines.
pub fn format_event(event: &DomainEvent) -> String {
    match event.attribute_name() {
        Some(attribute_name) => format!(
            "{:?}:{}/{}/{}",
            event.kind(),
            event.realm(),
            event.asset_id(),
            attribute_name
        ),
        None => format!("{:?}:{}/{}", event.kind(), event.realm(), event.asset_id()),
    }
}

/// Renders only the restricting dimensions of a filter.
pub fn format_filter(filter: &DomainFilter) -> String {
    let mut parts = vec![format!("realm={}", filter.realm)];
    if !filter.asset_ids.is_empty() {
        parts.push(format!("asset_ids={}", filter.asset_ids.join(",")));
    }
    if !filter.parent_ids.is_empty() {
        let parents: Vec<&str> = filter
            .parent_ids
            .iter()
            .map(|parent| parent.as_deref().unwrap_or(NONE))
            .collect();
        parts.push(format!("parent_ids={}", parents.join(",")));
    }
    if !filter.paths.is_empty() {
        parts.push(format!("paths={}", filter.paths.join(",")));
    }
    if !filter.attribute_names.is_empty() {
        parts.push(format!("attribute_names={}", filter.attribute_names.join(",")));
    }
    parts.join(" ")
}
