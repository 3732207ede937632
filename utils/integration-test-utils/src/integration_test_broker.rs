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

use asset_gateway::{BrokerEngine, QualityOfService};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedDelivery {
    pub session_id: String,
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QualityOfService,
}

impl RecordedDelivery {
    pub fn payload_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.payload).expect("delivered payload should be JSON")
    }
}

/// Broker engine that records every delivery in arrival order.
#[derive(Default)]
pub struct RecordingBroker {
    deliveries: Mutex<Vec<RecordedDelivery>>,
}

impl RecordingBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries.lock().clone()
    }

    pub fn deliveries_for(&self, session_id: &str) -> Vec<RecordedDelivery> {
        self.deliveries
            .lock()
            .iter()
            .filter(|delivery| delivery.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.deliveries.lock().len()
    }

    pub fn clear(&self) {
        self.deliveries.lock().clear();
    }
}

impl BrokerEngine for RecordingBroker {
    fn deliver(&self, session_id: &str, topic: &str, payload: Vec<u8>, qos: QualityOfService) {
        debug!(session_id, topic, "recording broker delivery");
        self.deliveries.lock().push(RecordedDelivery {
            session_id: session_id.to_string(),
            topic: topic.to_string(),
            payload,
            qos,
        });
    }
}
