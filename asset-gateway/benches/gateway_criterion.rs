use asset_gateway::{
    AssetGateway, AuthorizationDecision, BrokerEngine, Credentials, DomainEvent,
    EventKind, EventTopicRewriter, FilterBuilder, GatewayConfig, Operation, QualityOfService, TopicBinding,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use integration_test_utils::{
    asset_created, attribute_changed, FixedAuthorizer, InMemoryEventBus, StaticIdentityProvider,
    TEST_ASSET_ID_PATTERN,
};
use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Builder;

const SUBSCRIPTION_TOPICS: [&str; 12] = [
    "realmA/bench/asset/#",
    "realmA/bench/asset/+",
    "realmA/bench/asset/ast-1",
    "realmA/bench/attribute/ast-1",
    "realmA/bench/attribute/temperature",
    "realmA/bench/asset/ast-1/#",
    "realmA/bench/asset/ast-1/+",
    "realmA/bench/attribute/ast-1/#",
    "realmA/bench/attribute/ast-1/+",
    "realmA/bench/attribute/ast-1/temperature",
    "realmA/bench/attribute/+/temperature",
    "realmA/bench/attribute-value/ast-1/+/temperature",
];
const AUTHORIZER_CHAIN_LEN: usize = 8;

struct DiscardingBroker;

impl BrokerEngine for DiscardingBroker {
    fn deliver(&self, _session_id: &str, topic: &str, payload: Vec<u8>, _qos: QualityOfService) {
        black_box((topic, payload));
    }
}

fn bench_config() -> GatewayConfig {
    GatewayConfig {
        asset_id_pattern: TEST_ASSET_ID_PATTERN.to_string(),
        ..GatewayConfig::default()
    }
}

fn sample_event(binding: &TopicBinding) -> DomainEvent {
    let event = if binding.filter().event_kind == EventKind::Asset {
        asset_created("realmA", &["ast-1", "ast-2"])
    } else {
        attribute_changed("realmA", &["ast-1", "ast-2"], "temperature", json!(21.5))
    };
    if binding.filter().matches(&event) {
        event
    } else if binding.filter().event_kind == EventKind::Asset {
        asset_created("realmA", &["ast-1"])
    } else {
        attribute_changed("realmA", &["ast-1"], "temperature", json!(21.5))
    }
}

fn gateway_criterion(c: &mut Criterion) {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("benchmark runtime should build");

    let builder = FilterBuilder::new(
        bench_config()
            .asset_id_syntax()
            .expect("asset id pattern should compile"),
    );

    let mut filter_group = c.benchmark_group("filter_building");
    filter_group.bench_function("bind_all_shapes", |b| {
        b.iter(|| {
            let bound = SUBSCRIPTION_TOPICS
                .iter()
                .filter(|topic| builder.bind_str(black_box(topic)).is_ok())
                .count();
            black_box(bound);
        });
    });
    filter_group.bench_function("reject_unsupported_shape", |b| {
        b.iter(|| {
            let rejected = builder
                .bind_str(black_box("realmA/bench/attribute/ast-1/ast-2/+"))
                .is_err();
            black_box(rejected);
        });
    });
    filter_group.finish();

    let rewriter = EventTopicRewriter::new();
    let bindings: Vec<(TopicBinding, DomainEvent)> = SUBSCRIPTION_TOPICS
        .iter()
        .map(|topic| {
            let binding = builder
                .bind_str(topic)
                .expect("benchmark topic should bind");
            let event = sample_event(&binding);
            (binding, event)
        })
        .collect();

    let mut rewrite_group = c.benchmark_group("topic_rewrite");
    rewrite_group.bench_function("rewrite_all_shapes", |b| {
        b.iter(|| {
            let rewritten = bindings
                .iter()
                .filter(|(binding, event)| rewriter.rewrite(binding, event).is_ok())
                .count();
            black_box(rewritten);
        });
    });
    rewrite_group.finish();

    let identity = StaticIdentityProvider::new().with_client("realmA", "bench", "secret", &[]);
    let gateway = AssetGateway::new(
        bench_config(),
        Arc::new(identity),
        Arc::new(InMemoryEventBus::new()),
        Arc::new(DiscardingBroker),
    )
    .expect("benchmark gateway should build");
    runtime
        .block_on(gateway.connect("bench-session", "realmA", "bench", &Credentials::new("bench", "secret")))
        .expect("benchmark session should connect");
    let handle = runtime
        .block_on(gateway.subscribe(
            "bench-session",
            "realmA/bench/attribute/ast-1/+",
            QualityOfService::AtMostOnce,
        ))
        .expect("benchmark subscription should register");
    let event = attribute_changed("realmA", &["ast-1", "ast-2"], "temperature", json!(21.5));

    let mut dispatch_group = c.benchmark_group("subscription_dispatch");
    dispatch_group.bench_function("single_subscription", |b| {
        b.iter(|| {
            let outcome = gateway
                .dispatcher()
                .dispatch(&handle.subscription_id, black_box(&event));
            black_box(outcome.is_delivered());
        });
    });
    dispatch_group.bench_function("stale_subscription", |b| {
        let missing = "not-registered".to_string();
        b.iter(|| {
            let outcome = gateway.dispatcher().dispatch(&missing, black_box(&event));
            black_box(outcome);
        });
    });
    dispatch_group.finish();

    for index in 0..AUTHORIZER_CHAIN_LEN {
        gateway.add_authorizer(FixedAuthorizer::new(
            &format!("deferring-{index}"),
            AuthorizationDecision::NoOpinion,
        ));
    }
    gateway.add_authorizer(FixedAuthorizer::new("last", AuthorizationDecision::Allow));

    let mut authorization_group = c.benchmark_group("authorization_chain");
    authorization_group.bench_function("repeat_topic", |b| {
        b.iter(|| {
            let decision = gateway
                .authorize("bench-session", black_box("realmA/bench/asset/ast-1"), Operation::Read)
                .expect("bench session is connected");
            black_box(decision);
        });
    });
    authorization_group.bench_function("fresh_topic", |b| {
        let mut sequence = 0usize;
        b.iter(|| {
            sequence += 1;
            let topic = format!("realmA/bench/asset/ast-{sequence}");
            let decision = gateway
                .authorize("bench-session", &topic, Operation::Read)
                .expect("bench session is connected");
            black_box(decision);
        });
    });
    authorization_group.finish();
}

criterion_group!(benches, gateway_criterion);
criterion_main!(benches);
