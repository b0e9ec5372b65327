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

//! Google Forms API client.
//!
//! [`FormsClient`] reads form metadata and submitted responses. It
//! authenticates in exactly one [`CredentialMode`], picked once when the client
//! is built:
//!
//! - service account, from `GOOGLE_SERVICE_ACCOUNT_JSON` or
//!   `GOOGLE_SERVICE_ACCOUNT_PATH`
//! - API key, from `GOOGLE_API_KEY` (form metadata only)
//! - OAuth2 delegated access, from `GOOGLE_CLIENT_SECRETS_PATH`
//!
//! ## Example
//!
//! ```no_run
//! use gforms::FormsClient;
//! use gforms_core::{Context, OsEnv};
//!
//! # async fn example(ctx: Context) -> gforms_core::Result<()> {
//! let client = FormsClient::from_env(ctx.with_env(OsEnv)).await?;
//! let form = client.get_form("1FAIpQLSd-example").await?;
//! println!("{}", form["info"]["title"]);
//! # Ok(())
//! # }
//! ```

mod constants;

mod config;
pub use config::{Config, ExplicitCredentials};

mod credential;
pub use credential::{ClientSecrets, CredentialMode, DelegatedToken, ServiceAccount, Token};

mod token_endpoint;

mod token_store;
pub use token_store::{FileTokenStore, TokenStore};

mod provide_authorization;
pub use provide_authorization::{
    ApiKeyProvider, JwtBearerExchange, MintToken, OAuth2Provider, ObtainConsent,
    ServiceAccountProvider, UnconfiguredProvider, UnconfiguredReason,
};

mod resolve;
pub use resolve::{CredentialResolver, ResolvedCredential};

mod client;
pub use client::{FormMetadata, FormsClient, FormsClientBuilder, ResponseCollection};
