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

use std::fmt::{self, Debug};
use std::sync::Arc;

use bytes::Bytes;
use http::header::ACCEPT;
use http::StatusCode;
use log::{debug, info};
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;

use gforms_core::{Authorization, Context, Error, ProvideAuthorization, Result};

use crate::config::{Config, ExplicitCredentials};
use crate::constants::PATH_SEGMENT_ENCODE_SET;
use crate::credential::CredentialMode;
use crate::provide_authorization::{
    ApiKeyProvider, MintToken, OAuth2Provider, ObtainConsent, ServiceAccountProvider,
    UnconfiguredProvider,
};
use crate::resolve::{CredentialResolver, ResolvedCredential};
use crate::token_store::{FileTokenStore, TokenStore};

/// Form metadata exactly as returned by the Forms API.
pub type FormMetadata = serde_json::Value;

/// Form responses exactly as returned by the Forms API.
pub type ResponseCollection = serde_json::Value;

/// FormsClient reads forms and their responses.
///
/// The credential is resolved once when the client is built; every call
/// reuses the same authorization provider. Cloning a client shares that
/// provider, including its cached token.
#[derive(Clone)]
pub struct FormsClient {
    ctx: Context,
    endpoint: String,
    mode: CredentialMode,
    provider: Arc<dyn ProvideAuthorization>,
}

impl Debug for FormsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormsClient")
            .field("endpoint", &self.endpoint)
            .field("mode", &self.mode)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl FormsClient {
    /// Start building a client.
    pub fn builder() -> FormsClientBuilder {
        FormsClientBuilder::default()
    }

    /// Build a client from the context environment alone.
    pub async fn from_env(ctx: Context) -> Result<Self> {
        Self::builder().build(ctx).await
    }

    /// Build a service account client from a key file.
    ///
    /// Ambient configuration is not consulted.
    pub async fn from_service_account_file(ctx: Context, path: impl Into<String>) -> Result<Self> {
        Self::builder()
            .config(Config::default())
            .service_account_path(path)
            .force_service_account()
            .build(ctx)
            .await
    }

    /// Build a service account client from key file content.
    ///
    /// Ambient configuration is not consulted.
    pub async fn from_service_account_json(
        ctx: Context,
        content: impl Into<String>,
    ) -> Result<Self> {
        Self::builder()
            .config(Config::default())
            .service_account_json(content)
            .force_service_account()
            .build(ctx)
            .await
    }

    /// The mode this client authenticates with.
    pub fn mode(&self) -> CredentialMode {
        self.mode
    }

    /// Whether this client authenticates as a service account.
    pub fn is_service_account_auth(&self) -> bool {
        self.mode == CredentialMode::ServiceAccount
    }

    /// Whether the next request can be authorized without contacting any
    /// authority.
    ///
    /// API key clients always are. Token based clients are once a valid token
    /// is cached. Unconfigured clients never are.
    pub async fn is_authenticated(&self) -> bool {
        self.provider.is_authenticated().await
    }

    /// Produce the authorization the next request would carry.
    ///
    /// For OAuth2 clients this is also the explicit step that loads, refreshes
    /// or obtains the delegated token.
    pub async fn authorize(&self) -> Result<Authorization> {
        self.provider
            .provide_authorization(&self.ctx)
            .await
            .map_err(|e| e.with_context("mode", self.mode))
    }

    /// Fetch the metadata of a form.
    pub async fn get_form(&self, form_id: &str) -> Result<FormMetadata> {
        self.get_json(form_id, "")
            .await
            .map_err(|e| e.with_context("mode", self.mode))
    }

    /// Fetch the submitted responses of a form.
    ///
    /// API key clients are refused before any request is sent.
    pub async fn get_form_responses(&self, form_id: &str) -> Result<ResponseCollection> {
        if !self.mode.can_read_responses() {
            return Err(Error::unsupported(
                "form responses require service account or oauth2 authentication",
            )
            .with_context("mode", self.mode)
            .with_context("form_id", form_id));
        }

        self.get_json(form_id, "/responses")
            .await
            .map_err(|e| e.with_context("mode", self.mode))
    }

    async fn get_json(&self, form_id: &str, suffix: &str) -> Result<serde_json::Value> {
        if form_id.trim().is_empty() {
            return Err(Error::request_invalid("form id must not be empty"));
        }

        let url = format!(
            "{}/forms/{}{suffix}",
            self.endpoint.trim_end_matches('/'),
            utf8_percent_encode(form_id, &PATH_SEGMENT_ENCODE_SET)
        );

        let authorization = self.provider.provide_authorization(&self.ctx).await?;
        let (mut parts, body) = http::Request::get(&url)
            .header(ACCEPT, "application/json")
            .body(Bytes::new())?
            .into_parts();
        authorization.apply(&mut parts)?;

        debug!("sending GET {url}");
        let resp = self
            .ctx
            .http_send(http::Request::from_parts(parts, body))
            .await
            .map_err(|e| e.with_context("form_id", form_id))?;

        let status = resp.status();
        if status.is_success() {
            return serde_json::from_slice(resp.body()).map_err(|e| {
                Error::transport("failed to parse forms api response")
                    .with_context("form_id", form_id)
                    .with_source(e)
            });
        }

        debug!("forms api answered GET {url} with {status}");
        let err = match status {
            StatusCode::UNAUTHORIZED => {
                Error::unauthenticated("forms api rejected the presented credential")
            }
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Error::not_found(format!(
                "form `{form_id}` does not exist or is not accessible"
            )),
            _ => Error::transport(format!("forms api returned unexpected status {status}")),
        };
        let err = err
            .with_context("form_id", form_id)
            .with_context("status", status);

        Err(match remote_message(resp.body()) {
            Some(message) => err.with_context("remote", message),
            None => err,
        })
    }
}

/// Error body of Google APIs.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

fn remote_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.is_empty())
}

/// FormsClientBuilder collects explicit arguments and collaborators for a
/// [`FormsClient`].
///
/// Explicit credentials take precedence over [`Config`] values of the same
/// kind. Without [`FormsClientBuilder::config`], config is read from the
/// context environment.
#[derive(Default)]
pub struct FormsClientBuilder {
    explicit: ExplicitCredentials,
    config: Option<Config>,
    minter: Option<Arc<dyn MintToken>>,
    token_store: Option<Arc<dyn TokenStore>>,
    consent: Option<Arc<dyn ObtainConsent>>,
}

impl Debug for FormsClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormsClientBuilder")
            .field("explicit", &self.explicit)
            .field("config", &self.config)
            .field("minter", &self.minter)
            .field("token_store", &self.token_store)
            .field("consent", &self.consent)
            .finish()
    }
}

impl FormsClientBuilder {
    /// Use this API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.explicit.api_key = Some(key.into());
        self
    }

    /// Load the service account from this file.
    pub fn service_account_path(mut self, path: impl Into<String>) -> Self {
        self.explicit.service_account_path = Some(path.into());
        self
    }

    /// Decode the service account from this JSON content.
    pub fn service_account_json(mut self, content: impl Into<String>) -> Self {
        self.explicit.service_account_json = Some(content.into());
        self
    }

    /// Require service account authentication.
    pub fn force_service_account(mut self) -> Self {
        self.explicit.force_service_account = true;
        self
    }

    /// Use this config instead of reading the environment.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace how service account assertions are exchanged for tokens.
    pub fn token_minter(mut self, minter: impl MintToken) -> Self {
        self.minter = Some(Arc::new(minter));
        self
    }

    /// Replace where the delegated OAuth2 token is stored.
    pub fn token_store(mut self, store: impl TokenStore) -> Self {
        self.token_store = Some(Arc::new(store));
        self
    }

    /// Allow an interactive consent flow when no delegated token is stored.
    pub fn consent_flow(mut self, consent: impl ObtainConsent) -> Self {
        self.consent = Some(Arc::new(consent));
        self
    }

    /// Resolve the credential and build the client.
    ///
    /// Fails when configured credential material is unreadable or invalid.
    /// A client without any credential builds fine and fails on use.
    pub async fn build(self, ctx: Context) -> Result<FormsClient> {
        let config = match self.config {
            Some(config) => config,
            None => Config::from_env(&ctx),
        };

        let resolved = CredentialResolver::new(self.explicit, config.clone())
            .resolve(&ctx)
            .await?;
        let mode = resolved.mode();

        let provider: Arc<dyn ProvideAuthorization> = match resolved {
            ResolvedCredential::ApiKey(key) => {
                Arc::new(ApiKeyProvider::new(key).map_err(|e| e.with_context("mode", mode))?)
            }
            ResolvedCredential::ServiceAccount {
                service_account,
                input,
            } => {
                let mut provider = ServiceAccountProvider::new(service_account)
                    .map_err(|e| e.with_context("input", input).with_context("mode", mode))?
                    .with_scopes(config.scopes.clone());
                if let Some(minter) = self.minter {
                    provider = provider.with_minter(minter);
                }
                Arc::new(provider)
            }
            ResolvedCredential::OAuth2 {
                client_secrets,
                token_path,
            } => {
                let store: Arc<dyn TokenStore> = match self.token_store {
                    Some(store) => store,
                    None => Arc::new(FileTokenStore::new(token_path)),
                };
                let mut provider =
                    OAuth2Provider::new(client_secrets, store).with_scopes(config.scopes.clone());
                if let Some(consent) = self.consent {
                    provider = provider.with_consent(consent);
                }
                Arc::new(provider)
            }
            ResolvedCredential::Unconfigured(reason) => {
                Arc::new(UnconfiguredProvider::new(reason))
            }
        };

        info!("forms client ready in {mode} mode");
        Ok(FormsClient {
            ctx,
            endpoint: config.endpoint,
            mode,
            provider,
        })
    }
}
