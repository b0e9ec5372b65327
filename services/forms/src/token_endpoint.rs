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

//! OAuth2 token endpoint calls shared by service accounts and delegated access.

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, StatusCode};
use log::{debug, error};
use serde::Deserialize;

use gforms_core::time::{after_secs, DateTime};
use gforms_core::{Context, Error, Result};

/// Successful token endpoint response.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    pub fn expires_at(&self) -> Option<DateTime> {
        self.expires_in.map(after_secs)
    }
}

/// Error body returned by Google's token endpoint.
#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// POST a form encoded grant to `url` and decode the token response.
///
/// A 4xx answer means the authority rejected the grant and is reported as a
/// credential error carrying the status and the OAuth2 error code. 429, 5xx
/// and other unexpected answers are transport errors.
pub(crate) async fn request_token(
    ctx: &Context,
    url: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse> {
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();

    let req = http::Request::builder()
        .method(Method::POST)
        .uri(url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(ACCEPT, "application/json")
        .body(Bytes::from(body))?;

    debug!("requesting token from {url}");
    let resp = ctx.http_send(req).await?;

    let status = resp.status();
    if status != StatusCode::OK {
        error!("token request to {url} got unexpected status {status}");
        let reason = match serde_json::from_slice::<TokenErrorResponse>(resp.body()) {
            Ok(e) => match e.error_description {
                Some(desc) => format!("{}: {desc}", e.error),
                None => e.error,
            },
            Err(_) => String::from_utf8_lossy(resp.body()).into_owned(),
        };
        let err = if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
            Error::credential_invalid(format!("token endpoint rejected the grant: {reason}"))
        } else {
            Error::transport(format!("token endpoint is unavailable: {reason}"))
        };
        return Err(err
            .with_context("status", status)
            .with_context("token_uri", url));
    }

    serde_json::from_slice(resp.body()).map_err(|e| {
        Error::transport("failed to parse token response")
            .with_context("token_uri", url)
            .with_source(e)
    })
}
