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

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::debug;
use serde::Serialize;

use gforms_core::time::now;
use gforms_core::{
    Authorization, CachedCredential, Context, CredentialCache, Error, ProvideAuthorization,
    Result,
};

use crate::constants::{
    ASSERTION_LIFETIME_SECS, JWT_BEARER_GRANT_TYPE, SCOPE_FORMS_BODY_READONLY,
    SCOPE_FORMS_RESPONSES_READONLY,
};
use crate::credential::{ServiceAccount, Token};
use crate::token_endpoint::request_token;

/// MintToken exchanges a signed service account assertion for a bearer token.
#[async_trait]
pub trait MintToken: Debug + Send + Sync + 'static {
    /// Exchange `assertion` at `token_uri` for a bearer token and its expiry.
    async fn mint_token(&self, ctx: &Context, token_uri: &str, assertion: &str) -> Result<Token>;
}

/// JwtBearerExchange performs the RFC 7523 JWT bearer grant over the
/// context's [`HttpSend`](gforms_core::HttpSend).
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtBearerExchange;

#[async_trait]
impl MintToken for JwtBearerExchange {
    async fn mint_token(&self, ctx: &Context, token_uri: &str, assertion: &str) -> Result<Token> {
        let resp = request_token(
            ctx,
            token_uri,
            &[("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion)],
        )
        .await?;

        Ok(Token {
            expires_at: resp.expires_at(),
            access_token: resp.access_token,
        })
    }
}

/// Claims is used to build the JWT assertion for Google's token endpoint.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    exp: u64,
    iat: u64,
}

/// ServiceAccountProvider authorizes requests with bearer tokens minted for a
/// service account.
///
/// The private key is parsed once at construction. A minted token is cached
/// and reused until it is about to expire.
pub struct ServiceAccountProvider {
    service_account: ServiceAccount,
    signing_key: EncodingKey,
    scopes: Vec<String>,
    minter: Arc<dyn MintToken>,
    cache: CredentialCache<Token>,
}

impl Debug for ServiceAccountProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountProvider")
            .field("service_account", &self.service_account)
            .field("scopes", &self.scopes)
            .field("minter", &self.minter)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountProvider {
    /// Create a new ServiceAccountProvider.
    ///
    /// Fails if the private key is not a PEM encoded RSA key.
    pub fn new(service_account: ServiceAccount) -> Result<Self> {
        let signing_key = EncodingKey::from_rsa_pem(service_account.private_key.as_bytes())
            .map_err(|e| {
                Error::credential_invalid("service account private_key is not a valid RSA key")
                    .with_context("client_email", &service_account.client_email)
                    .with_source(e)
            })?;

        Ok(Self {
            service_account,
            signing_key,
            scopes: vec![
                SCOPE_FORMS_BODY_READONLY.to_string(),
                SCOPE_FORMS_RESPONSES_READONLY.to_string(),
            ],
            minter: Arc::new(JwtBearerExchange),
            cache: CredentialCache::new(),
        })
    }

    /// Set the OAuth2 scopes requested for minted tokens.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Replace the token minting exchange.
    pub fn with_minter(mut self, minter: Arc<dyn MintToken>) -> Self {
        self.minter = minter;
        self
    }

    /// The service account backing this provider.
    pub fn service_account(&self) -> &ServiceAccount {
        &self.service_account
    }

    fn sign_assertion(&self) -> Result<String> {
        let iat = u64::try_from(now().timestamp()).unwrap_or_default();
        let claims = Claims {
            iss: self.service_account.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.service_account.token_uri().to_string(),
            exp: iat + ASSERTION_LIFETIME_SECS,
            iat,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.service_account.private_key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.signing_key).map_err(|e| {
            Error::credential_invalid("failed to sign service account assertion").with_source(e)
        })
    }
}

#[async_trait]
impl ProvideAuthorization for ServiceAccountProvider {
    async fn provide_authorization(&self, ctx: &Context) -> Result<Authorization> {
        let token = self
            .cache
            .get_or_refresh(|_| async {
                debug!(
                    "minting bearer token for service account {}",
                    self.service_account.client_email
                );
                let assertion = self.sign_assertion()?;
                self.minter
                    .mint_token(ctx, self.service_account.token_uri(), &assertion)
                    .await
            })
            .await
            .map_err(|e| e.with_context("client_email", &self.service_account.client_email))?;

        Ok(Authorization::bearer(token.access_token))
    }

    async fn is_authenticated(&self) -> bool {
        self.cache.peek().await.is_valid()
    }
}
