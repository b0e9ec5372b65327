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

use gforms_core::utils::Redact;
use gforms_core::Context;

use crate::constants::*;

/// Config carries the ambient configuration of a forms client.
///
/// Every field mirrors one environment key; [`Config::from_env`] fills them
/// from the [`Context`] environment. Empty values are treated as absent.
#[derive(Clone)]
pub struct Config {
    /// API key, from `GOOGLE_API_KEY`.
    pub api_key: Option<String>,
    /// Service account file path, from `GOOGLE_SERVICE_ACCOUNT_PATH`.
    pub service_account_path: Option<String>,
    /// Service account JSON content, from `GOOGLE_SERVICE_ACCOUNT_JSON`.
    pub service_account_json: Option<String>,
    /// Require service account authentication, from `USE_SERVICE_ACCOUNT`.
    pub use_service_account: bool,
    /// OAuth2 client secrets file path, from `GOOGLE_CLIENT_SECRETS_PATH`.
    pub client_secrets_path: Option<String>,
    /// Where the delegated OAuth2 token is stored, from `GOOGLE_TOKEN_PATH`.
    pub token_path: Option<String>,
    /// Base url of the Forms API.
    pub endpoint: String,
    /// OAuth2 scopes requested by service accounts and delegated access.
    pub scopes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            service_account_path: None,
            service_account_json: None,
            use_service_account: false,
            client_secrets_path: None,
            token_path: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            scopes: vec![
                SCOPE_FORMS_BODY_READONLY.to_string(),
                SCOPE_FORMS_RESPONSES_READONLY.to_string(),
            ],
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &Redact::from(&self.api_key))
            .field("service_account_path", &self.service_account_path)
            .field(
                "service_account_json",
                &self.service_account_json.as_ref().map(|_| "<redacted>"),
            )
            .field("use_service_account", &self.use_service_account)
            .field("client_secrets_path", &self.client_secrets_path)
            .field("token_path", &self.token_path)
            .field("endpoint", &self.endpoint)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl Config {
    /// Create a new config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the service account file path.
    pub fn with_service_account_path(mut self, path: impl Into<String>) -> Self {
        self.service_account_path = Some(path.into());
        self
    }

    /// Set the service account JSON content.
    pub fn with_service_account_json(mut self, content: impl Into<String>) -> Self {
        self.service_account_json = Some(content.into());
        self
    }

    /// Require service account authentication.
    pub fn with_use_service_account(mut self) -> Self {
        self.use_service_account = true;
        self
    }

    /// Set the OAuth2 client secrets file path.
    pub fn with_client_secrets_path(mut self, path: impl Into<String>) -> Self {
        self.client_secrets_path = Some(path.into());
        self
    }

    /// Set the delegated token path.
    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Set the Forms API base url.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the requested OAuth2 scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Self {
        let var = |key: &str| ctx.env_var(key).filter(|v| !v.trim().is_empty());

        Self {
            api_key: var(GOOGLE_API_KEY),
            service_account_path: var(GOOGLE_SERVICE_ACCOUNT_PATH),
            service_account_json: var(GOOGLE_SERVICE_ACCOUNT_JSON),
            use_service_account: var(USE_SERVICE_ACCOUNT).is_some_and(|v| is_truthy(&v)),
            client_secrets_path: var(GOOGLE_CLIENT_SECRETS_PATH),
            token_path: var(GOOGLE_TOKEN_PATH),
            ..Self::default()
        }
    }

    /// The token path, falling back to `token.json`.
    pub fn token_path_or_default(&self) -> &str {
        self.token_path.as_deref().unwrap_or(DEFAULT_TOKEN_PATH)
    }
}

/// Explicit constructor arguments.
///
/// Values set here always take precedence over [`Config`] values of the same
/// kind.
#[derive(Clone, Default)]
pub struct ExplicitCredentials {
    /// API key.
    pub api_key: Option<String>,
    /// Service account file path.
    pub service_account_path: Option<String>,
    /// Service account JSON content.
    pub service_account_json: Option<String>,
    /// Require service account authentication.
    pub force_service_account: bool,
}

impl Debug for ExplicitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplicitCredentials")
            .field("api_key", &Redact::from(&self.api_key))
            .field("service_account_path", &self.service_account_path)
            .field(
                "service_account_json",
                &self.service_account_json.as_ref().map(|_| "<redacted>"),
            )
            .field("force_service_account", &self.force_service_account)
            .finish()
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1")
}
