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

use std::fmt::{self, Debug, Display};

use gforms_core::time::{is_unexpired, DateTime};
use gforms_core::utils::Redact;
use gforms_core::{CachedCredential, Error, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TOKEN_URI, SERVICE_ACCOUNT_TYPE, TOKEN_EXPIRY_BUFFER_SECS};

/// CredentialMode is the authentication mode a client runs in.
///
/// It is chosen once when the client is built and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialMode {
    /// A long-lived API key sent as the `key` query parameter.
    ApiKey,
    /// A service account exchanging signed assertions for bearer tokens.
    ServiceAccount,
    /// User-delegated access through an OAuth2 consent flow.
    OAuth2,
    /// No usable credential material was found.
    Unconfigured,
}

impl CredentialMode {
    /// Whether form responses can be read in this mode.
    ///
    /// API keys only reach public form metadata.
    pub fn can_read_responses(self) -> bool {
        !matches!(self, CredentialMode::ApiKey)
    }
}

impl Display for CredentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialMode::ApiKey => f.write_str("api_key"),
            CredentialMode::ServiceAccount => f.write_str("service_account"),
            CredentialMode::OAuth2 => f.write_str("oauth2"),
            CredentialMode::Unconfigured => f.write_str("unconfigured"),
        }
    }
}

/// ServiceAccount holds the fields of a service account key file that are
/// needed to mint bearer tokens.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccount {
    /// Credential type discriminator, always `service_account`.
    #[serde(rename = "type")]
    pub kind: String,
    /// PEM encoded private key.
    pub private_key: String,
    /// The client email of credential.
    pub client_email: String,
    /// Identifier of the private key, sent as the JWT `kid`.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// The project the service account belongs to.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Token endpoint, defaults to Google's OAuth2 endpoint.
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &Redact::from(&self.private_key))
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccount {
    /// Decode and validate a service account from JSON bytes.
    pub fn from_slice(v: &[u8]) -> Result<Self> {
        let sa: ServiceAccount = serde_json::from_slice(v).map_err(|e| {
            Error::credential_invalid(format!("service account json is malformed: {e}"))
                .with_source(e)
        })?;
        sa.validate()?;
        Ok(sa)
    }

    /// Decode and validate a service account from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Self::from_slice(content.as_bytes())
    }

    /// The token endpoint to exchange assertions with.
    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }

    fn validate(&self) -> Result<()> {
        if self.kind != SERVICE_ACCOUNT_TYPE {
            return Err(Error::credential_invalid(format!(
                "expected credential type `{SERVICE_ACCOUNT_TYPE}`, got `{}`",
                self.kind
            )));
        }
        if self.private_key.trim().is_empty() {
            return Err(Error::credential_invalid(
                "service account private_key is empty",
            ));
        }
        if self.client_email.trim().is_empty() {
            return Err(Error::credential_invalid(
                "service account client_email is empty",
            ));
        }
        Ok(())
    }
}

/// Token is a bearer token minted for a service account.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Token {
    /// The access token.
    pub access_token: String,
    /// The expiration time of the token.
    pub expires_at: Option<DateTime>,
}

impl Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &Redact::from(&self.access_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl CachedCredential for Token {
    fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && is_unexpired(self.expires_at, TOKEN_EXPIRY_BUFFER_SECS)
    }
}

/// ClientSecrets identifies an OAuth2 client for delegated access.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    /// The client ID.
    pub client_id: String,
    /// The client secret.
    pub client_secret: String,
    /// Consent page url.
    #[serde(default)]
    pub auth_uri: Option<String>,
    /// Token endpoint, defaults to Google's OAuth2 endpoint.
    #[serde(default)]
    pub token_uri: Option<String>,
    /// Registered redirect uris.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

impl Debug for ClientSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecrets")
            .field("client_id", &self.client_id)
            .field("client_secret", &Redact::from(&self.client_secret))
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .field("redirect_uris", &self.redirect_uris)
            .finish()
    }
}

/// Layouts a client secrets file may use.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClientSecretsFile {
    Installed { installed: ClientSecrets },
    Web { web: ClientSecrets },
    Flat(ClientSecrets),
}

impl ClientSecrets {
    /// Decode client secrets from JSON bytes.
    ///
    /// Both the `installed`/`web` wrapped layout downloaded from the console
    /// and a flat object are accepted.
    pub fn from_slice(v: &[u8]) -> Result<Self> {
        let file: ClientSecretsFile = serde_json::from_slice(v).map_err(|e| {
            Error::credential_invalid(format!("client secrets json is malformed: {e}"))
                .with_source(e)
        })?;

        let secrets = match file {
            ClientSecretsFile::Installed { installed } => installed,
            ClientSecretsFile::Web { web } => web,
            ClientSecretsFile::Flat(secrets) => secrets,
        };
        if secrets.client_id.trim().is_empty() {
            return Err(Error::credential_invalid("client secrets client_id is empty"));
        }
        Ok(secrets)
    }

    /// The token endpoint used for refresh.
    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

/// DelegatedToken is the user-delegated OAuth2 token persisted between runs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedToken {
    /// Short-lived access token.
    #[serde(alias = "token")]
    pub access_token: String,
    /// Long-lived refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry of the access token.
    #[serde(default, alias = "expiry", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime>,
}

impl Debug for DelegatedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedToken")
            .field("access_token", &Redact::from(&self.access_token))
            .field("refresh_token", &Redact::from(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl CachedCredential for DelegatedToken {
    fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && is_unexpired(self.expires_at, TOKEN_EXPIRY_BUFFER_SECS)
    }
}
