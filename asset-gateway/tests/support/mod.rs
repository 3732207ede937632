#![allow(dead_code)]

use asset_gateway::{AssetGateway, Connection, Credentials, GatewayConfig};
use integration_test_utils::{
    InMemoryEventBus, RecordingBroker, StaticIdentityProvider, TEST_ASSET_ID_PATTERN,
};
use std::sync::Arc;

pub(crate) const REALM: &str = "realmA";
pub(crate) const SECRET: &str = "secret";

pub(crate) struct Harness {
    pub(crate) gateway: AssetGateway,
    pub(crate) bus: Arc<InMemoryEventBus>,
    pub(crate) broker: Arc<RecordingBroker>,
}

pub(crate) fn test_config() -> GatewayConfig {
    GatewayConfig {
        asset_id_pattern: TEST_ASSET_ID_PATTERN.to_string(),
        ..GatewayConfig::default()
    }
}

/// Gateway over in-memory collaborators; `clients` share [`REALM`] and [`SECRET`].
pub(crate) fn make_harness(clients: &[&str]) -> Harness {
    make_harness_with_config(clients, test_config())
}

pub(crate) fn make_harness_with_config(clients: &[&str], config: GatewayConfig) -> Harness {
    integration_test_utils::init_logging();

    let identity = clients
        .iter()
        .fold(StaticIdentityProvider::new(), |provider, client| {
            provider.with_client(REALM, client, SECRET, &["read:assets"])
        });
    let bus = Arc::new(InMemoryEventBus::new());
    let broker = Arc::new(RecordingBroker::new());
    let gateway = AssetGateway::new(config, Arc::new(identity), bus.clone(), broker.clone())
        .expect("gateway creation should succeed");

    Harness {
        gateway,
        bus,
        broker,
    }
}

pub(crate) async fn connect_ok(harness: &Harness, session_id: &str, client_id: &str) -> Arc<Connection> {
    harness
        .gateway
        .connect(
            session_id,
            REALM,
            client_id,
            &Credentials::new(client_id, SECRET),
        )
        .await
        .expect("connect should succeed")
}

pub(crate) fn topic(client_id: &str, address: &str) -> String {
    format!("{REALM}/{client_id}/{address}")
}
