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

use asset_gateway::{ClientIdentity, Credentials, QualityOfService};
use futures::future::join_all;
use integration_test_utils::{asset_created, attribute_changed};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use support::{connect_ok, make_harness, topic, REALM, SECRET};

const CLIENTS: [&str; 4] = ["clientA", "clientB", "clientC", "clientD"];
const EVENTS_PER_PUBLISHER: usize = 50;
const PUBLISHERS: usize = 4;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_publishers_deliver_each_event_once_per_subscriber() {
    let harness = make_harness(&CLIENTS);
    for (index, client) in CLIENTS.iter().enumerate() {
        let session = format!("s{index}");
        connect_ok(&harness, &session, client).await;
        harness
            .gateway
            .subscribe(&session, &topic(client, "asset/#"), QualityOfService::AtLeastOnce)
            .await
            .unwrap();
    }

    let publishers = (0..PUBLISHERS).map(|publisher| {
        let bus = harness.bus.clone();
        tokio::spawn(async move {
            for sequence in 0..EVENTS_PER_PUBLISHER {
                let asset_id = format!("ast-{publisher}x{sequence}");
                bus.publish(asset_created(REALM, &["ast-root", asset_id.as_str()])).await;
            }
        })
    });
    for result in join_all(publishers).await {
        result.expect("publisher task should finish");
    }

    let deliveries = harness.broker.deliveries();
    let expected = CLIENTS.len() * PUBLISHERS * EVENTS_PER_PUBLISHER;
    assert_eq!(deliveries.len(), expected);

    let unique: HashSet<(String, String)> = deliveries
        .iter()
        .map(|delivery| (delivery.session_id.clone(), delivery.topic.clone()))
        .collect();
    assert_eq!(unique.len(), expected, "no event delivered twice");

    for (index, client) in CLIENTS.iter().enumerate() {
        let session = format!("s{index}");
        let prefix = topic(client, "asset/");
        let mine = harness.broker.deliveries_for(&session);
        assert_eq!(mine.len(), PUBLISHERS * EVENTS_PER_PUBLISHER);
        assert!(mine.iter().all(|delivery| delivery.topic.starts_with(&prefix)));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn nothing_is_delivered_after_disconnect_returns() {
    let harness = make_harness(&["clientA", "clientB"]);
    connect_ok(&harness, "leaving", "clientA").await;
    connect_ok(&harness, "staying", "clientB").await;
    harness
        .gateway
        .subscribe("leaving", &topic("clientA", "attribute/+/temperature"), QualityOfService::AtMostOnce)
        .await
        .unwrap();
    harness
        .gateway
        .subscribe("staying", &topic("clientB", "attribute/+/temperature"), QualityOfService::AtMostOnce)
        .await
        .unwrap();

    let publishers: Vec<_> = (0..PUBLISHERS)
        .map(|publisher| {
            let bus = harness.bus.clone();
            tokio::spawn(async move {
                for sequence in 0..EVENTS_PER_PUBLISHER {
                    let asset_id = format!("ast-{publisher}x{sequence}");
                    bus.publish(attribute_changed(
                        REALM,
                        &[asset_id.as_str()],
                        "temperature",
                        json!(sequence),
                    ))
                    .await;
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    tokio::task::yield_now().await;
    assert!(harness.gateway.disconnect("leaving").await);
    let delivered_before_return = harness.broker.deliveries_for("leaving").len();

    for result in join_all(publishers).await {
        result.expect("publisher task should finish");
    }

    assert_eq!(
        harness.broker.deliveries_for("leaving").len(),
        delivered_before_return
    );
    assert_eq!(
        harness.broker.deliveries_for("staying").len(),
        PUBLISHERS * EVENTS_PER_PUBLISHER
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unsubscribe_during_publishing_stops_only_that_subscription() {
    let harness = make_harness(&["clientA"]);
    connect_ok(&harness, "s1", "clientA").await;
    let kept_topic = topic("clientA", "asset/#");
    let dropped_topic = topic("clientA", "asset/ast-root/+");
    for subscription_topic in [&kept_topic, &dropped_topic] {
        harness
            .gateway
            .subscribe("s1", subscription_topic, QualityOfService::AtMostOnce)
            .await
            .unwrap();
    }

    let publishers: Vec<_> = (0..PUBLISHERS)
        .map(|publisher| {
            let bus = harness.bus.clone();
            tokio::spawn(async move {
                for sequence in 0..EVENTS_PER_PUBLISHER {
                    let asset_id = format!("ast-{publisher}x{sequence}");
                    bus.publish(asset_created(REALM, &["ast-root", asset_id.as_str()]))
                        .await;
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    // Children of ast-root are published under it only for the dropped subscription.
    let dropped_prefix = format!("{}/", topic("clientA", "asset/ast-root"));
    let dropped_deliveries = |harness: &support::Harness| {
        harness
            .broker
            .deliveries_for("s1")
            .into_iter()
            .filter(|delivery| delivery.topic.starts_with(&dropped_prefix))
            .count()
    };

    tokio::task::yield_now().await;
    assert!(harness.gateway.unsubscribe("s1", &dropped_topic).await.unwrap());
    let dropped_before_return = dropped_deliveries(&harness);

    for result in join_all(publishers).await {
        result.expect("publisher task should finish");
    }

    assert_eq!(dropped_deliveries(&harness), dropped_before_return);

    let kept: Vec<String> = harness
        .broker
        .deliveries_for("s1")
        .into_iter()
        .filter(|delivery| !delivery.topic.starts_with(&dropped_prefix))
        .map(|delivery| delivery.topic)
        .collect();
    let unique: HashSet<&String> = kept.iter().collect();
    assert_eq!(kept.len(), PUBLISHERS * EVENTS_PER_PUBLISHER);
    assert_eq!(unique.len(), kept.len(), "no event delivered twice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_connects_for_one_identity_leave_a_single_connection() {
    let harness = Arc::new(make_harness(&["clientA"]));

    let connects = (0..8).map(|attempt| {
        let harness = harness.clone();
        tokio::spawn(async move {
            harness
                .gateway
                .connect(
                    format!("s{attempt}"),
                    REALM,
                    "clientA",
                    &Credentials::new("clientA", SECRET),
                )
                .await
                .map(|connection| connection.session_id().to_string())
        })
    });
    for result in join_all(connects).await {
        result.expect("connect task should finish").expect("connect should succeed");
    }

    assert_eq!(harness.gateway.connection_count(), 1);
    let holder = harness
        .gateway
        .registry()
        .get_by_identity(&ClientIdentity::new(REALM, "clientA"))
        .expect("identity should be leased");
    assert!(!holder.is_closed());
    assert!(Arc::ptr_eq(
        &harness.gateway.connection(holder.session_id()).unwrap(),
        &holder
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_subscribes_are_all_recorded() {
    let harness = make_harness(&["clientA"]);
    let connection = connect_ok(&harness, "s1", "clientA").await;
    let topics: Vec<String> = (0..20)
        .map(|index| topic("clientA", &format!("asset/ast-{index}")))
        .collect();

    let results = join_all(topics.iter().map(|asset_topic| {
        harness
            .gateway
            .subscribe("s1", asset_topic, QualityOfService::AtMostOnce)
    }))
    .await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(connection.subscription_count(), topics.len());
    assert_eq!(harness.bus.registration_count(), topics.len());
    assert_eq!(harness.gateway.registry().subscription_count(), topics.len());
}
