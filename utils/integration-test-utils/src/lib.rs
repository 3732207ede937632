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

mod integration_test_utils;
pub use integration_test_utils::{init_logging, TEST_ASSET_ID_PATTERN};

mod integration_test_broker;
pub use integration_test_broker::{RecordedDelivery, RecordingBroker};

mod integration_test_event_bus;
pub use integration_test_event_bus::{FailingEventBus, InMemoryEventBus};

mod integration_test_identity;
pub use integration_test_identity::StaticIdentityProvider;

mod integration_test_authorizers;
pub use integration_test_authorizers::{
    FixedAuthorizer, PrefixAuthorizer, RecordedPublish, RecordingAuthorizer,
};

mod integration_test_events;
pub use integration_test_events::{asset_created, attribute_changed, lineage};
