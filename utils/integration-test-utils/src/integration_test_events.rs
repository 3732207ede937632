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

use asset_gateway::{AssetEvent, AssetEventCause, AttributeEvent, DomainEvent};

/// Root-to-self asset path, e.g. `lineage(&["ast-1", "ast-2"])`.
pub fn lineage(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// Asset creation for the last id of `path`; its parent is the one before.
pub fn asset_created(realm: &str, path: &[&str]) -> DomainEvent {
    let (asset_id, parent_id) = split_path(path);
    DomainEvent::Asset(AssetEvent {
        realm: realm.to_string(),
        asset_id,
        parent_id,
        path: lineage(path),
        cause: AssetEventCause::Create,
    })
}

pub fn attribute_changed(
    realm: &str,
    path: &[&str],
    attribute_name: &str,
    value: serde_json::Value,
) -> DomainEvent {
    let (asset_id, parent_id) = split_path(path);
    DomainEvent::Attribute(AttributeEvent {
        realm: realm.to_string(),
        asset_id,
        parent_id,
        path: lineage(path),
        attribute_name: attribute_name.to_string(),
        value: Some(value),
    })
}

fn split_path(path: &[&str]) -> (String, Option<String>) {
    match path {
        [] => panic!("asset path must contain at least the asset itself"),
        [.., parent, asset] => (asset.to_string(), Some(parent.to_string())),
        [asset] => (asset.to_string(), None),
    }
}
