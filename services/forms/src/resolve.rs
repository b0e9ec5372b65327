// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use log::debug;

use gforms_core::{Context, Error, Result};

use crate::config::{Config, ExplicitCredentials};
use crate::constants::*;
use crate::credential::{ClientSecrets, CredentialMode, ServiceAccount};
use crate::provide_authorization::UnconfiguredReason;

/// Credential material picked by [`CredentialResolver`].
#[derive(Debug, Clone)]
pub enum ResolvedCredential {
    /// An API key.
    ApiKey(String),
    /// A decoded service account.
    ServiceAccount {
        /// The service account.
        service_account: ServiceAccount,
        /// The argument or env key the service account came from.
        input: &'static str,
    },
    /// OAuth2 client secrets and where the delegated token lives.
    OAuth2 {
        /// The OAuth2 client.
        client_secrets: ClientSecrets,
        /// Path of the delegated token.
        token_path: String,
    },
    /// Nothing usable was found.
    Unconfigured(UnconfiguredReason),
}

impl ResolvedCredential {
    /// The mode this credential runs in.
    pub fn mode(&self) -> CredentialMode {
        match self {
            ResolvedCredential::ApiKey(_) => CredentialMode::ApiKey,
            ResolvedCredential::ServiceAccount { .. } => CredentialMode::ServiceAccount,
            ResolvedCredential::OAuth2 { .. } => CredentialMode::OAuth2,
            ResolvedCredential::Unconfigured(_) => CredentialMode::Unconfigured,
        }
    }
}

/// Where a service account comes from, labelled with the input that named it.
enum ServiceAccountSource<'a> {
    Json(&'static str, &'a str),
    Path(&'static str, &'a str),
}

impl ServiceAccountSource<'_> {
    fn input(&self) -> &'static str {
        match self {
            ServiceAccountSource::Json(input, _) | ServiceAccountSource::Path(input, _) => input,
        }
    }
}

/// CredentialResolver decides which credential a client uses.
///
/// The first match wins:
///
/// 1. service account material, explicit json, explicit path, configured json,
///    configured path
/// 2. forced service account without material, unconfigured
/// 3. api key, explicit then configured
/// 4. configured client secrets, OAuth2
/// 5. unconfigured
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver {
    explicit: ExplicitCredentials,
    config: Config,
}

impl CredentialResolver {
    /// Create a resolver over explicit arguments and ambient config.
    pub fn new(explicit: ExplicitCredentials, config: Config) -> Self {
        Self { explicit, config }
    }

    /// Resolve the credential.
    ///
    /// Material that is present but unreadable or malformed fails here, with
    /// the offending input named in the error context.
    pub async fn resolve(&self, ctx: &Context) -> Result<ResolvedCredential> {
        if let Some(source) = self.service_account_source() {
            let input = source.input();
            let sa = load_service_account(ctx, source).await.map_err(|e| {
                e.with_context("mode", CredentialMode::ServiceAccount)
            })?;
            debug!("resolved service account {} from {input}", sa.client_email);
            return Ok(ResolvedCredential::ServiceAccount {
                service_account: sa,
                input,
            });
        }

        let forced_by = if self.explicit.force_service_account {
            Some(ARG_FORCE_SERVICE_ACCOUNT)
        } else if self.config.use_service_account {
            Some(USE_SERVICE_ACCOUNT)
        } else {
            None
        };
        if let Some(flag) = forced_by {
            debug!("service account required by {flag} but none configured");
            return Ok(ResolvedCredential::Unconfigured(
                UnconfiguredReason::ServiceAccountForced(flag),
            ));
        }

        if let Some(key) = non_empty(&self.explicit.api_key).or(non_empty(&self.config.api_key)) {
            debug!("resolved api key");
            return Ok(ResolvedCredential::ApiKey(key.to_string()));
        }

        if let Some(path) = non_empty(&self.config.client_secrets_path) {
            let client_secrets = load_client_secrets(ctx, path).await.map_err(|e| {
                e.with_context("mode", CredentialMode::OAuth2)
                    .with_context("input", GOOGLE_CLIENT_SECRETS_PATH)
            })?;
            let token_path = self.config.token_path_or_default().to_string();
            debug!(
                "resolved oauth2 client {} with token at {token_path}",
                client_secrets.client_id
            );
            return Ok(ResolvedCredential::OAuth2 {
                client_secrets,
                token_path,
            });
        }

        debug!("no credentials configured");
        Ok(ResolvedCredential::Unconfigured(
            UnconfiguredReason::NoCredentials,
        ))
    }

    fn service_account_source(&self) -> Option<ServiceAccountSource<'_>> {
        if let Some(v) = non_empty(&self.explicit.service_account_json) {
            return Some(ServiceAccountSource::Json(ARG_SERVICE_ACCOUNT_JSON, v));
        }
        if let Some(v) = non_empty(&self.explicit.service_account_path) {
            return Some(ServiceAccountSource::Path(ARG_SERVICE_ACCOUNT_PATH, v));
        }
        if let Some(v) = non_empty(&self.config.service_account_json) {
            return Some(ServiceAccountSource::Json(GOOGLE_SERVICE_ACCOUNT_JSON, v));
        }
        if let Some(v) = non_empty(&self.config.service_account_path) {
            return Some(ServiceAccountSource::Path(GOOGLE_SERVICE_ACCOUNT_PATH, v));
        }
        None
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|v| !v.trim().is_empty())
}

async fn load_service_account(
    ctx: &Context,
    source: ServiceAccountSource<'_>,
) -> Result<ServiceAccount> {
    match source {
        ServiceAccountSource::Json(input, content) => {
            ServiceAccount::from_json(content).map_err(|e| e.with_context("input", input))
        }
        ServiceAccountSource::Path(input, path) => {
            let content = ctx.file_read(path).await.map_err(|e| {
                Error::config_invalid("failed to read service account file")
                    .with_context("input", input)
                    .with_context("path", path)
                    .with_source(e)
            })?;
            ServiceAccount::from_slice(&content).map_err(|e| {
                e.with_context("input", input).with_context("path", path)
            })
        }
    }
}

async fn load_client_secrets(ctx: &Context, path: &str) -> Result<ClientSecrets> {
    let content = ctx.file_read(path).await.map_err(|e| {
        Error::config_invalid("failed to read client secrets file")
            .with_context("path", path)
            .with_source(e)
    })?;
    ClientSecrets::from_slice(&content).map_err(|e| e.with_context("path", path))
}
