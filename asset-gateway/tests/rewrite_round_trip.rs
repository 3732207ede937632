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

mod support;

use asset_gateway::{
    AssetIdSyntax, DomainEvent, EventTopicRewriter, FilterBuilder, QualityOfService,
};
use integration_test_utils::{asset_created, attribute_changed, TEST_ASSET_ID_PATTERN};
use serde_json::json;
use support::{connect_ok, make_harness, topic, REALM};

fn builder() -> FilterBuilder {
    FilterBuilder::new(AssetIdSyntax::new(TEST_ASSET_ID_PATTERN).expect("valid pattern"))
}

/// Subscription topics paired with an event their filter selects and the
/// concrete topic the event must be published on.
fn wildcard_cases() -> Vec<(&'static str, DomainEvent, &'static str)> {
    let temperature = json!(21.5);
    vec![
        (
            "realmA/c/asset/#",
            asset_created(REALM, &["ast-1", "ast-5"]),
            "realmA/c/asset/ast-5",
        ),
        (
            "realmA/c/asset/+",
            asset_created(REALM, &["ast-5"]),
            "realmA/c/asset/ast-5",
        ),
        (
            "realmA/c/asset/ast-1/#",
            asset_created(REALM, &["ast-1", "ast-3", "ast-7"]),
            "realmA/c/asset/ast-1/ast-7",
        ),
        (
            "realmA/c/asset/ast-1/+",
            asset_created(REALM, &["ast-1", "ast-2"]),
            "realmA/c/asset/ast-1/ast-2",
        ),
        (
            "realmA/c/attribute/ast-1/#",
            attribute_changed(REALM, &["ast-1", "ast-3"], "humidity", temperature.clone()),
            "realmA/c/attribute/ast-1/humidity",
        ),
        (
            "realmA/c/attribute/ast-1/+",
            attribute_changed(REALM, &["ast-1", "ast-2"], "humidity", temperature.clone()),
            "realmA/c/attribute/ast-1/humidity",
        ),
        (
            "realmA/c/attribute/+/temperature",
            attribute_changed(REALM, &["ast-9"], "temperature", temperature.clone()),
            "realmA/c/attribute/ast-9/temperature",
        ),
        (
            "realmA/c/attribute/ast-1/+/temperature",
            attribute_changed(REALM, &["ast-1", "ast-2"], "temperature", temperature.clone()),
            "realmA/c/attribute/ast-1/ast-2/temperature",
        ),
        (
            "realmA/c/attribute-value/ast-1/+/temperature",
            attribute_changed(REALM, &["ast-1", "ast-2"], "temperature", temperature),
            "realmA/c/attribute-value/ast-1/ast-2/temperature",
        ),
    ]
}

#[test]
fn rewritten_topic_maps_back_to_a_filter_selecting_the_event() {
    let builder = builder();
    let rewriter = EventTopicRewriter::new();

    for (subscription, event, concrete) in wildcard_cases() {
        let binding = builder.bind_str(subscription).expect("subscription should bind");
        assert!(
            binding.filter().matches(&event),
            "{subscription} should select its sample event"
        );

        let rewritten = rewriter
            .resolve_topic(&binding, &event)
            .expect("event should rewrite");
        assert_eq!(rewritten, concrete, "rewrite of {subscription}");

        let wildcard = binding.wildcard().expect("case has a wildcard");
        let mut tokens: Vec<&str> = rewritten.split('/').collect();
        tokens[wildcard.position] = wildcard.wildcard.as_str();
        let restored = builder
            .bind_str(&tokens.join("/"))
            .expect("restored topic should bind");

        assert_eq!(restored.filter(), binding.filter(), "restored {subscription}");
        assert!(restored.filter().matches(&event), "restored {subscription}");
    }
}

#[test]
fn concrete_topics_rewrite_to_themselves() {
    let builder = builder();
    let rewriter = EventTopicRewriter::new();
    let cases = [
        ("realmA/c/asset/ast-1", asset_created(REALM, &["ast-1"])),
        (
            "realmA/c/attribute/ast-1",
            attribute_changed(REALM, &["ast-1"], "temperature", json!(1)),
        ),
        (
            "realmA/c/attribute/temperature",
            attribute_changed(REALM, &["ast-4"], "temperature", json!(1)),
        ),
        (
            "realmA/c/attribute/ast-1/temperature",
            attribute_changed(REALM, &["ast-1"], "temperature", json!(1)),
        ),
    ];

    for (subscription, event) in cases {
        let binding = builder.bind_str(subscription).unwrap();
        assert!(binding.filter().matches(&event));
        assert_eq!(
            rewriter.resolve_topic(&binding, &event).unwrap(),
            subscription
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn published_events_arrive_on_concrete_topics_with_payloads() {
    let harness = make_harness(&["clientX"]);
    connect_ok(&harness, "s1", "clientX").await;

    harness
        .gateway
        .subscribe("s1", &topic("clientX", "asset/+"), QualityOfService::AtLeastOnce)
        .await
        .unwrap();
    harness
        .gateway
        .subscribe(
            "s1",
            &topic("clientX", "attribute-value/ast-9/temperature"),
            QualityOfService::AtMostOnce,
        )
        .await
        .unwrap();

    assert_eq!(harness.bus.publish(asset_created(REALM, &["ast-123"])).await, 1);
    assert_eq!(
        harness
            .bus
            .publish(attribute_changed(REALM, &["ast-9"], "temperature", json!(19.25)))
            .await,
        1
    );
    // A child asset does not match the root-level wildcard.
    assert_eq!(harness.bus.publish(asset_created(REALM, &["ast-1", "ast-2"])).await, 0);

    let deliveries = harness.broker.deliveries_for("s1");
    assert_eq!(deliveries.len(), 2);

    assert_eq!(deliveries[0].topic, "realmA/clientX/asset/ast-123");
    assert_eq!(deliveries[0].qos, QualityOfService::AtLeastOnce);
    let envelope = deliveries[0].payload_json();
    assert_eq!(envelope["eventType"], "asset");
    assert_eq!(envelope["assetId"], "ast-123");
    assert_eq!(envelope["parentId"], serde_json::Value::Null);

    assert_eq!(deliveries[1].topic, "realmA/clientX/attribute-value/ast-9/temperature");
    assert_eq!(deliveries[1].payload_json(), json!(19.25));
}

#[tokio::test(flavor = "multi_thread")]
async fn batched_notifications_dispatch_each_event() {
    let harness = make_harness(&["clientX"]);
    connect_ok(&harness, "s1", "clientX").await;
    harness
        .gateway
        .subscribe("s1", &topic("clientX", "attribute/ast-1/+"), QualityOfService::AtMostOnce)
        .await
        .unwrap();

    let notified = harness
        .bus
        .publish_batch(vec![
            attribute_changed(REALM, &["ast-1", "ast-2"], "temperature", json!(1)),
            attribute_changed(REALM, &["ast-1", "ast-3"], "humidity", json!(2)),
            attribute_changed(REALM, &["ast-4"], "humidity", json!(3)),
        ])
        .await;

    assert_eq!(notified, 1);
    let topics: Vec<String> = harness
        .broker
        .deliveries()
        .into_iter()
        .map(|delivery| delivery.topic)
        .collect();
    assert_eq!(
        topics,
        vec![
            "realmA/clientX/attribute/ast-1/temperature".to_string(),
            "realmA/clientX/attribute/ast-1/humidity".to_string(),
        ]
    );
}
