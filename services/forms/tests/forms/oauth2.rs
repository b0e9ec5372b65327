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

use async_trait::async_trait;
use gforms::{ClientSecrets, CredentialMode, DelegatedToken, FormsClient, ObtainConsent};
use gforms_core::time::after_secs;
use gforms_core::{Authorization, Context, ErrorKind, Result};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::mock::{context, testdata, MockHttpSend};

const EXPIRED_TOKEN: &str = r#"{
  "access_token": "stale",
  "refresh_token": "1//refresh",
  "expires_at": "2020-01-01T00:00:00Z"
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn token_path(&self) -> String {
        self.dir
            .path()
            .join("token.json")
            .to_string_lossy()
            .into_owned()
    }

    fn write_token(&self, content: &str) {
        std::fs::write(self.token_path(), content).unwrap();
    }

    fn read_token(&self) -> DelegatedToken {
        serde_json::from_slice(&std::fs::read(self.token_path()).unwrap()).unwrap()
    }

    fn context(&self, http: &MockHttpSend) -> Context {
        let client_secrets_path = testdata("client_secrets.json");
        let token_path = self.token_path();
        context(
            http,
            &[
                ("GOOGLE_CLIENT_SECRETS_PATH", client_secrets_path.as_str()),
                ("GOOGLE_TOKEN_PATH", token_path.as_str()),
            ],
        )
    }
}

#[derive(Debug)]
struct GrantingConsent;

#[async_trait]
impl ObtainConsent for GrantingConsent {
    async fn obtain_consent(
        &self,
        _: &Context,
        client_secrets: &ClientSecrets,
        _: &[String],
    ) -> Result<DelegatedToken> {
        Ok(DelegatedToken {
            access_token: format!("granted-to-{}", client_secrets.client_id),
            refresh_token: Some("1//granted".to_string()),
            expires_at: Some(after_secs(3600)),
        })
    }
}

#[tokio::test]
async fn test_stored_token_is_presented() {
    let fixture = Fixture::new();
    fixture.write_token(r#"{"access_token":"stored","refresh_token":"1//refresh"}"#);
    let http = MockHttpSend::new().route("/v1/forms/f1/responses", 200, "{}");

    let client = FormsClient::from_env(fixture.context(&http)).await.unwrap();
    assert_eq!(client.mode(), CredentialMode::OAuth2);

    client.get_form_responses("f1").await.unwrap();
    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer stored"));
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_persisted() {
    let fixture = Fixture::new();
    fixture.write_token(EXPIRED_TOKEN);
    let http = MockHttpSend::new()
        .route(
            "/token",
            200,
            r#"{"access_token":"refreshed","expires_in":3600}"#,
        )
        .route("/v1/forms/f1", 200, "{}");

    let client = FormsClient::from_env(fixture.context(&http)).await.unwrap();
    client.get_form("f1").await.unwrap();
    client.get_form("f1").await.unwrap();

    assert_eq!(http.count("/token"), 1);
    let requests = http.requests();
    let refresh = &requests[0];
    assert!(refresh.body.contains("grant_type=refresh_token"));
    assert!(refresh.body.contains("refresh_token=1%2F%2Frefresh"));
    assert!(refresh
        .body
        .contains("client_id=client-id.apps.googleusercontent.com"));
    assert_eq!(
        requests[1].authorization.as_deref(),
        Some("Bearer refreshed")
    );

    let stored = fixture.read_token();
    assert_eq!(stored.access_token, "refreshed");
    assert_eq!(stored.refresh_token.as_deref(), Some("1//refresh"));
    assert!(stored.expires_at.is_some());
}

#[tokio::test]
async fn test_rejected_refresh_is_credential_error() {
    let fixture = Fixture::new();
    fixture.write_token(EXPIRED_TOKEN);
    let http = MockHttpSend::new().route(
        "/token",
        400,
        r#"{"error":"invalid_grant","error_description":"Token has been expired or revoked."}"#,
    );

    let client = FormsClient::from_env(fixture.context(&http)).await.unwrap();
    let err = client.get_form("f1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert_eq!(err.context_value("mode"), Some("oauth2"));
    assert_eq!(http.count("/v1/forms/f1"), 0);
}

#[tokio::test]
async fn test_missing_token_without_consent() {
    let fixture = Fixture::new();
    let http = MockHttpSend::new();

    let client = FormsClient::from_env(fixture.context(&http)).await.unwrap();
    let err = client.authorize().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert_eq!(err.context_value("mode"), Some("oauth2"));
    assert_eq!(err.context_value("input"), Some(fixture.token_path().as_str()));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_consent_token_is_persisted() {
    let fixture = Fixture::new();
    let http = MockHttpSend::new();

    let client = FormsClient::builder()
        .consent_flow(GrantingConsent)
        .build(fixture.context(&http))
        .await
        .unwrap();

    assert_eq!(
        client.authorize().await.unwrap(),
        Authorization::bearer("granted-to-client-id.apps.googleusercontent.com")
    );
    assert_eq!(
        fixture.read_token().refresh_token.as_deref(),
        Some("1//granted")
    );
}

#[tokio::test]
async fn test_missing_client_secrets_fails_at_build() {
    let http = MockHttpSend::new();
    let err = FormsClient::from_env(context(
        &http,
        &[("GOOGLE_CLIENT_SECRETS_PATH", "/nonexistent/client_secrets.json")],
    ))
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(err.context_value("mode"), Some("oauth2"));
    assert_eq!(
        err.context_value("input"),
        Some("GOOGLE_CLIENT_SECRETS_PATH")
    );
}
