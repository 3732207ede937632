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

use crate::authorization::chain::{
    AuthorizationChain, AuthorizationDecision, Operation, TopicAuthorizer,
};
use crate::config::GatewayConfig;
use crate::control_plane::connection::{ClientIdentity, Connection, SessionSubscription};
use crate::control_plane::connection_registry::ConnectionRegistry;
use crate::data_plane::subscription_dispatcher::SubscriptionDispatcher;
use crate::error::{
    AuthorizeError, ConfigError, ConnectError, SubscribeError, UnsubscribeError,
};
use crate::model::{DomainFilter, QualityOfService, SessionId, SubscriptionId};
use crate::observability::{events, fields};
use crate::ports::{BrokerEngine, Credentials, EventBus, EventListener, IdentityProvider};
use crate::routing::filter_builder::FilterBuilder;
use crate::routing::topic::Topic;
use std::sync::Arc;
use tracing::{debug, info, warn};

const COMPONENT: &str = "asset_gateway";

/// What a successful subscribe hands back to the broker engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriptionHandle {
    pub subscription_id: SubscriptionId,
    pub filter: DomainFilter,
}

/// Entry point the broker engine drives for every client operation.
///
/// Connections live in a [`ConnectionRegistry`]. Subscriptions are
/// registered with the [`EventBus`] using the gateway's dispatcher as the
/// listener, so matched events flow back through
/// [`AssetGateway::event_listener`] to the [`BrokerEngine`].
pub struct AssetGateway {
    config: GatewayConfig,
    filter_builder: FilterBuilder,
    registry: Arc<ConnectionRegistry>,
    authorization: AuthorizationChain,
    dispatcher: Arc<SubscriptionDispatcher>,
    identity_provider: Arc<dyn IdentityProvider>,
    event_bus: Arc<dyn EventBus>,
}

impl AssetGateway {
    pub fn new(
        config: GatewayConfig,
        identity_provider: Arc<dyn IdentityProvider>,
        event_bus: Arc<dyn EventBus>,
        broker: Arc<dyn BrokerEngine>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let filter_builder = FilterBuilder::new(config.asset_id_syntax()?);
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Arc::new(SubscriptionDispatcher::new(registry.clone(), broker));
        let authorization = AuthorizationChain::new(config.topic_ownership_capacity);

        info!(
            event = events::GATEWAY_START,
            component = COMPONENT,
            listen_host = config.listen.host.as_str(),
            listen_port = config.listen.port,
            asset_id_pattern = config.asset_id_pattern.as_str(),
            "asset gateway created"
        );

        Ok(Self {
            config,
            filter_builder,
            registry,
            authorization,
            dispatcher,
            identity_provider,
            event_bus,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn filter_builder(&self) -> &FilterBuilder {
        &self.filter_builder
    }

    pub fn authorization(&self) -> &AuthorizationChain {
        &self.authorization
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &SubscriptionDispatcher {
        &self.dispatcher
    }

    /// Listener to hand to event buses that deliver outside `subscribe`.
    pub fn event_listener(&self) -> Arc<dyn EventListener> {
        self.dispatcher.clone()
    }

    pub fn connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.registry.get(session_id)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Authenticates a session and registers its connection.
    ///
    /// Any prior connection sharing the identity or the session id is torn
    /// down before this returns.
    pub async fn connect(
        &self,
        session_id: impl Into<SessionId>,
        realm: &str,
        client_id: &str,
        credentials: &Credentials,
    ) -> Result<Arc<Connection>, ConnectError> {
        let session_id = session_id.into();
        debug!(
            event = events::CONNECT_START,
            component = COMPONENT,
            session_id = session_id.as_str(),
            realm,
            client_id,
            "connect requested"
        );

        let verified = match self.identity_provider.verify(credentials).await {
            Ok(verified) => verified,
            Err(err) => {
                warn!(
                    event = events::CONNECT_REJECTED,
                    component = COMPONENT,
                    session_id = session_id.as_str(),
                    realm,
                    client_id,
                    err = %err,
                    "authentication failed"
                );
                return Err(err.into());
            }
        };

        if verified.realm != realm || verified.client_id != client_id {
            warn!(
                event = events::CONNECT_REJECTED,
                component = COMPONENT,
                session_id = session_id.as_str(),
                realm,
                client_id,
                verified_realm = verified.realm.as_str(),
                verified_client_id = verified.client_id.as_str(),
                "verified identity does not match the session"
            );
            return Err(ConnectError::IdentityMismatch {
                realm: realm.to_string(),
                client_id: client_id.to_string(),
                verified_realm: verified.realm,
                verified_client_id: verified.client_id,
            });
        }

        let registration = self.registry.register(
            session_id.clone(),
            ClientIdentity::new(verified.realm, verified.client_id),
            verified.roles,
        );

        for evicted in &registration.evicted {
            self.teardown(&evicted.connection).await;
        }

        info!(
            event = events::CONNECT_OK,
            component = COMPONENT,
            session_id = session_id.as_str(),
            realm,
            client_id,
            generation = registration.connection.generation(),
            evicted = registration.evicted.len(),
            "connection registered"
        );
        Ok(registration.connection)
    }

    /// Runs the authorization chain for one operation of a live session.
    ///
    /// [`AuthorizationDecision::NoOpinion`] leaves the outcome to the broker
    /// engine's default policy.
    pub fn authorize(
        &self,
        session_id: &str,
        topic: &str,
        operation: Operation,
    ) -> Result<AuthorizationDecision, AuthorizeError> {
        let connection = self
            .registry
            .get(session_id)
            .ok_or_else(|| AuthorizeError::UnknownSession(session_id.to_string()))?;
        let topic = Topic::parse(topic)?;
        self.authorize_connection(&connection, &topic, operation)
    }

    fn authorize_connection(
        &self,
        connection: &Connection,
        topic: &Topic,
        operation: Operation,
    ) -> Result<AuthorizationDecision, AuthorizeError> {
        if operation == Operation::Write && topic.has_wildcard() {
            return Err(AuthorizeError::WildcardPublish(topic.as_str().to_string()));
        }
        Ok(self.authorization.authorize(connection, topic, operation))
    }

    /// Authorizes a publish and hands allowed payloads to the topic owner.
    pub fn publish(
        &self,
        session_id: &str,
        topic: &str,
        payload: &[u8],
    ) -> Result<AuthorizationDecision, AuthorizeError> {
        let connection = self
            .registry
            .get(session_id)
            .ok_or_else(|| AuthorizeError::UnknownSession(session_id.to_string()))?;
        let topic = Topic::parse(topic)?;
        let decision = self.authorize_connection(&connection, &topic, Operation::Write)?;

        if decision.is_allowed() {
            if let Some(owner) = self.authorization.owner_of(topic.as_str()) {
                debug!(
                    event = events::PUBLISH_HANDOFF,
                    component = COMPONENT,
                    session_id,
                    topic = topic.as_str(),
                    authorizer = owner.name(),
                    payload_len = payload.len(),
                    "handing publish to topic owner"
                );
                owner.on_publish(&connection, &topic, payload);
            }
        }

        Ok(decision)
    }

    /// Derives the filter for `topic`, registers it with the event bus and
    /// records the subscription on the connection.
    ///
    /// The authorization chain is consulted as a read. Only an explicit deny
    /// rejects; when every authorizer defers the broker engine's default
    /// policy applies.
    ///
    /// Events the bus delivers before the connection records the
    /// subscription are dropped as stale.
    pub async fn subscribe(
        &self,
        session_id: &str,
        topic: &str,
        qos: QualityOfService,
    ) -> Result<SubscriptionHandle, SubscribeError> {
        debug!(
            event = events::SUBSCRIBE_START,
            component = COMPONENT,
            session_id,
            topic,
            "subscribe requested"
        );

        let result = self.try_subscribe(session_id, topic, qos).await;
        if let Err(err) = &result {
            warn!(
                event = events::SUBSCRIBE_REJECTED,
                component = COMPONENT,
                session_id,
                topic,
                err = %err,
                "subscribe rejected"
            );
        }
        result
    }

    async fn try_subscribe(
        &self,
        session_id: &str,
        topic: &str,
        qos: QualityOfService,
    ) -> Result<SubscriptionHandle, SubscribeError> {
        let connection = self
            .registry
            .get(session_id)
            .ok_or_else(|| SubscribeError::UnknownSession(session_id.to_string()))?;
        let binding = self.filter_builder.bind_str(topic)?;

        if binding.realm() != connection.realm() {
            return Err(SubscribeError::RealmMismatch {
                topic_realm: binding.realm().to_string(),
                connection_realm: connection.realm().to_string(),
            });
        }

        let decision = self
            .authorization
            .authorize(&connection, binding.topic(), Operation::Read);
        if decision == AuthorizationDecision::Deny {
            return Err(SubscribeError::Denied(topic.to_string()));
        }

        let limit = self.config.max_subscriptions_per_connection;
        connection.check_capacity(topic, limit)?;

        let filter = binding.filter().clone();
        let subscription_id = self
            .event_bus
            .register(filter.clone(), self.event_listener())
            .await?;
        self.registry
            .bind_subscription(subscription_id.clone(), connection.session_id().to_string());

        let subscription = SessionSubscription::new(subscription_id.clone(), binding, qos);
        match connection.insert_subscription(subscription, limit) {
            Ok(Some(replaced)) => {
                debug!(
                    event = events::SUBSCRIBE_REPLACED,
                    component = COMPONENT,
                    session_id,
                    topic,
                    subscription_id = replaced.id().as_str(),
                    "replacing previous subscription for topic"
                );
                self.release_subscription(session_id, replaced.id()).await;
            }
            Ok(None) => {}
            Err(err) => {
                self.release_subscription(session_id, &subscription_id).await;
                return Err(err);
            }
        }

        info!(
            event = events::SUBSCRIBE_OK,
            component = COMPONENT,
            session_id,
            topic,
            subscription_id = subscription_id.as_str(),
            filter = %fields::format_filter(&filter),
            qos = ?qos,
            "subscription registered"
        );
        Ok(SubscriptionHandle {
            subscription_id,
            filter,
        })
    }

    /// Removes the subscription held for `topic`. `Ok(false)` when there was none.
    pub async fn unsubscribe(&self, session_id: &str, topic: &str) -> Result<bool, UnsubscribeError> {
        let connection = self
            .registry
            .get(session_id)
            .ok_or_else(|| UnsubscribeError::UnknownSession(session_id.to_string()))?;

        let Some(subscription) = connection.remove_subscription_for_topic(topic) else {
            debug!(
                event = events::UNSUBSCRIBE_MISSING,
                component = COMPONENT,
                session_id,
                topic,
                "no subscription for topic"
            );
            return Ok(false);
        };

        self.registry.release_subscription(subscription.id());
        self.event_bus.unregister(subscription.id()).await?;

        info!(
            event = events::UNSUBSCRIBE_OK,
            component = COMPONENT,
            session_id,
            topic,
            subscription_id = subscription.id().as_str(),
            "subscription removed"
        );
        Ok(true)
    }

    /// Removes the session's connection and all of its subscriptions.
    pub async fn disconnect(&self, session_id: &str) -> bool {
        let Some(connection) = self.registry.remove(session_id) else {
            debug!(
                event = events::DISCONNECT_UNKNOWN_SESSION,
                component = COMPONENT,
                session_id,
                "disconnect for unknown session"
            );
            return false;
        };

        let released = self.teardown(&connection).await;
        info!(
            event = events::DISCONNECT_OK,
            component = COMPONENT,
            session_id,
            realm = connection.realm(),
            client_id = connection.client_id(),
            subscriptions = released,
            "connection removed"
        );
        true
    }

    pub fn add_authorizer(&self, authorizer: Arc<dyn TopicAuthorizer>) -> bool {
        self.authorization.register(authorizer)
    }

    pub fn remove_authorizer(&self, authorizer: &Arc<dyn TopicAuthorizer>) -> bool {
        self.authorization.deregister(authorizer)
    }

    /// The authorizer that owns `topic`, for custom publish handling.
    pub fn custom_handler_for_topic(&self, topic: &str) -> Option<Arc<dyn TopicAuthorizer>> {
        self.authorization.owner_of(topic)
    }

    /// Closes `connection` and unregisters everything it subscribed to.
    async fn teardown(&self, connection: &Connection) -> usize {
        let subscriptions = connection.close();
        for subscription in &subscriptions {
            self.release_subscription(connection.session_id(), subscription.id())
                .await;
        }
        subscriptions.len()
    }

    async fn release_subscription(&self, session_id: &str, subscription_id: &SubscriptionId) {
        self.registry.release_subscription(subscription_id);
        if let Err(err) = self.event_bus.unregister(subscription_id).await {
            warn!(
                event = events::EVENT_BUS_UNREGISTER_FAILED,
                component = COMPONENT,
                session_id,
                subscription_id = subscription_id.as_str(),
                err = %err,
                "event bus unregistration failed"
            );
        }
    }
}
