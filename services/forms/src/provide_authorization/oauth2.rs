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

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use gforms_core::{
    Authorization, CachedCredential, Context, CredentialCache, Error, ProvideAuthorization,
    Result,
};

use crate::constants::{SCOPE_FORMS_BODY_READONLY, SCOPE_FORMS_RESPONSES_READONLY};
use crate::credential::{ClientSecrets, DelegatedToken};
use crate::token_endpoint::request_token;
use crate::token_store::TokenStore;

/// ObtainConsent runs an interactive consent flow for delegated access.
///
/// gforms ships no implementation; applications that can open a browser or
/// prompt the user provide one.
#[async_trait]
pub trait ObtainConsent: Debug + Send + Sync + 'static {
    /// Ask the user to grant `scopes` to the client and return the token.
    async fn obtain_consent(
        &self,
        ctx: &Context,
        client_secrets: &ClientSecrets,
        scopes: &[String],
    ) -> Result<DelegatedToken>;
}

/// OAuth2Provider authorizes requests with a user-delegated token.
///
/// The token comes from the token store, or from the consent flow when the
/// store is empty. Expired tokens are refreshed with their refresh token and
/// written back to the store.
#[derive(Debug)]
pub struct OAuth2Provider {
    client_secrets: ClientSecrets,
    scopes: Vec<String>,
    store: Arc<dyn TokenStore>,
    consent: Option<Arc<dyn ObtainConsent>>,
    cache: CredentialCache<DelegatedToken>,
}

impl OAuth2Provider {
    /// Create a new OAuth2Provider without an interactive consent flow.
    pub fn new(client_secrets: ClientSecrets, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client_secrets,
            scopes: vec![
                SCOPE_FORMS_BODY_READONLY.to_string(),
                SCOPE_FORMS_RESPONSES_READONLY.to_string(),
            ],
            store,
            consent: None,
            cache: CredentialCache::new(),
        }
    }

    /// Set the OAuth2 scopes requested during consent.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Enable an interactive consent flow.
    pub fn with_consent(mut self, consent: Arc<dyn ObtainConsent>) -> Self {
        self.consent = Some(consent);
        self
    }

    async fn acquire(&self, ctx: &Context, cached: Option<DelegatedToken>) -> Result<DelegatedToken> {
        let current = match cached {
            Some(token) => Some(token),
            None => self.store.load(ctx).await?,
        };

        if let Some(token) = current {
            if token.is_valid() {
                debug!("using stored delegated token from {}", self.store.location());
                return Ok(token);
            }
            if let Some(refresh_token) = &token.refresh_token {
                let fresh = self.refresh(ctx, refresh_token).await?;
                self.persist(ctx, &fresh).await;
                return Ok(fresh);
            }
            debug!("stored delegated token expired and has no refresh token");
        }

        let Some(consent) = &self.consent else {
            return Err(Error::credential_invalid(
                "no usable delegated token is stored and no interactive consent flow is available",
            )
            .with_context("input", self.store.location()));
        };

        debug!("running consent flow for client {}", self.client_secrets.client_id);
        let token = consent
            .obtain_consent(ctx, &self.client_secrets, &self.scopes)
            .await?;
        self.persist(ctx, &token).await;
        Ok(token)
    }

    async fn refresh(&self, ctx: &Context, refresh_token: &str) -> Result<DelegatedToken> {
        debug!("refreshing delegated token for client {}", self.client_secrets.client_id);
        let resp = request_token(
            ctx,
            self.client_secrets.token_uri(),
            &[
                ("grant_type", "refresh_token"),
                ("client_id", &self.client_secrets.client_id),
                ("client_secret", &self.client_secrets.client_secret),
                ("refresh_token", refresh_token),
            ],
        )
        .await?;

        Ok(DelegatedToken {
            expires_at: resp.expires_at(),
            access_token: resp.access_token,
            // Google only returns a refresh token on the first grant.
            refresh_token: resp
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
        })
    }

    async fn persist(&self, ctx: &Context, token: &DelegatedToken) {
        if let Err(err) = self.store.save(ctx, token).await {
            warn!(
                "failed to persist delegated token to {}: {err}",
                self.store.location()
            );
        }
    }
}

#[async_trait]
impl ProvideAuthorization for OAuth2Provider {
    async fn provide_authorization(&self, ctx: &Context) -> Result<Authorization> {
        let token = self
            .cache
            .get_or_refresh(|cached| self.acquire(ctx, cached))
            .await?;

        Ok(Authorization::bearer(token.access_token))
    }

    async fn is_authenticated(&self) -> bool {
        self.cache.peek().await.is_valid()
    }
}
