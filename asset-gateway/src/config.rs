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

use crate::authorization::ownership::DEFAULT_OWNERSHIP_CAPACITY;
use crate::error::ConfigError;
use crate::routing::topic_rules::{AssetIdSyntax, DEFAULT_ASSET_ID_PATTERN};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const LISTEN_HOST_ENV: &str = "MQTT_SERVER_LISTEN_HOST";
pub const LISTEN_PORT_ENV: &str = "MQTT_SERVER_LISTEN_PORT";

pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";
pub const DEFAULT_LISTEN_PORT: u16 = 1883;
pub const DEFAULT_MAX_SUBSCRIPTIONS_PER_CONNECTION: usize = 100;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default = "default_asset_id_pattern")]
    pub asset_id_pattern: String,
    #[serde(default = "default_ownership_capacity")]
    pub topic_ownership_capacity: usize,
    #[serde(default = "default_max_subscriptions")]
    pub max_subscriptions_per_connection: usize,
}

/// Where the broker engine accepts client connections.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ListenConfig {
    #[serde(default = "default_listen_host")]
    pub host: String,
    #[serde(default = "default_listen_port")]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_listen_host(),
            port: default_listen_port(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            asset_id_pattern: default_asset_id_pattern(),
            topic_ownership_capacity: default_ownership_capacity(),
            max_subscriptions_per_connection: default_max_subscriptions(),
        }
    }
}

fn default_listen_host() -> String {
    DEFAULT_LISTEN_HOST.to_string()
}

fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

fn default_asset_id_pattern() -> String {
    DEFAULT_ASSET_ID_PATTERN.to_string()
}

fn default_ownership_capacity() -> usize {
    DEFAULT_OWNERSHIP_CAPACITY
}

fn default_max_subscriptions() -> usize {
    DEFAULT_MAX_SUBSCRIPTIONS_PER_CONNECTION
}

impl GatewayConfig {
    /// Reads, env-overrides and validates a JSON5 config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_json5_str(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json5_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(json5::from_str(contents)?)
    }

    /// Applies `MQTT_SERVER_LISTEN_HOST` / `MQTT_SERVER_LISTEN_PORT`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup(LISTEN_HOST_ENV) {
            self.listen.host = host;
        }
        if let Some(port) = lookup(LISTEN_PORT_ENV) {
            self.listen.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: LISTEN_PORT_ENV,
                value: port.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.asset_id_syntax()?;
        if self.topic_ownership_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "topic_ownership_capacity",
                value: "0".to_string(),
            });
        }
        if self.max_subscriptions_per_connection == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_subscriptions_per_connection",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn asset_id_syntax(&self) -> Result<AssetIdSyntax, ConfigError> {
        Ok(AssetIdSyntax::new(&self.asset_id_pattern)?)
    }
}
