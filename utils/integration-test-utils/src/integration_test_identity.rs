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

use asset_gateway::{AuthenticationError, Credentials, IdentityProvider, VerifiedIdentity};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Username/secret table backed identity provider.
#[derive(Default)]
pub struct StaticIdentityProvider {
    accounts: RwLock<HashMap<String, (String, VerifiedIdentity)>>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account whose username doubles as its client id.
    pub fn with_client(self, realm: &str, client_id: &str, secret: &str, roles: &[&str]) -> Self {
        self.add_account(
            client_id,
            secret,
            VerifiedIdentity {
                realm: realm.to_string(),
                client_id: client_id.to_string(),
                roles: roles.iter().map(|role| role.to_string()).collect(),
            },
        );
        self
    }

    pub fn add_account(&self, username: &str, secret: &str, identity: VerifiedIdentity) {
        self.accounts
            .write()
            .insert(username.to_string(), (secret.to_string(), identity));
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify(&self, credentials: &Credentials) -> Result<VerifiedIdentity, AuthenticationError> {
        match self.accounts.read().get(&credentials.username) {
            Some((secret, identity)) if *secret == credentials.secret => Ok(identity.clone()),
            _ => Err(AuthenticationError::InvalidCredentials),
        }
    }
}
