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

use gforms::{CredentialMode, FormsClient};
use gforms_core::ErrorKind;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use super::mock::{context, testdata, MockHttpSend, SA_JSON, TOKEN_RESPONSE};

const TOKEN_PATH: &str = "/token";

fn mock() -> MockHttpSend {
    MockHttpSend::new()
        .route(TOKEN_PATH, 200, TOKEN_RESPONSE)
        .route("/v1/forms/f1", 200, r#"{"formId":"f1"}"#)
        .route("/v1/forms/f1/responses", 200, r#"{"responses":[]}"#)
}

#[tokio::test]
async fn test_forced_service_account_without_material() {
    let http = mock();
    let client = FormsClient::from_env(context(
        &http,
        &[("USE_SERVICE_ACCOUNT", "true"), ("GOOGLE_API_KEY", "k1")],
    ))
    .await
    .unwrap();
    assert_eq!(client.mode(), CredentialMode::Unconfigured);

    let err = client.get_form("f1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(err.context_value("input"), Some("USE_SERVICE_ACCOUNT"));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_factory_with_empty_path_names_argument() {
    let http = mock();
    let client = FormsClient::from_service_account_file(
        context(&http, &[("USE_SERVICE_ACCOUNT", "true")]),
        "",
    )
    .await
    .unwrap();
    assert_eq!(client.mode(), CredentialMode::Unconfigured);

    let err = client.get_form("f1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(err.context_value("input"), Some("force_service_account"));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_responses_not_found_names_form() {
    let http = MockHttpSend::new()
        .route(TOKEN_PATH, 200, TOKEN_RESPONSE)
        .route("/v1/forms/f2/responses", 404, "{}");
    let client = FormsClient::from_env(context(
        &http,
        &[("GOOGLE_SERVICE_ACCOUNT_JSON", SA_JSON)],
    ))
    .await
    .unwrap();
    assert!(client.is_service_account_auth());

    let err = client.get_form_responses("f2").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.message().contains("f2"));
    assert_eq!(err.context_value("form_id"), Some("f2"));
    assert_eq!(err.context_value("mode"), Some("service_account"));
}

#[tokio::test]
async fn test_bearer_token_is_minted_once() {
    let http = mock();
    let client = FormsClient::from_env(context(
        &http,
        &[("GOOGLE_SERVICE_ACCOUNT_JSON", SA_JSON)],
    ))
    .await
    .unwrap();

    assert_eq!(client.get_form("f1").await.unwrap(), json!({"formId": "f1"}));
    assert_eq!(
        client.get_form_responses("f1").await.unwrap(),
        json!({"responses": []})
    );

    assert_eq!(http.count(TOKEN_PATH), 1);
    let requests = http.requests();
    let mint = &requests[0];
    assert_eq!(mint.method, http::Method::POST);
    assert!(mint
        .body
        .starts_with("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion="));
    for req in &requests[1..] {
        assert_eq!(req.authorization.as_deref(), Some("Bearer sa-token"));
        assert_eq!(req.uri.query(), None);
    }
}

#[tokio::test]
async fn test_is_authenticated_once_token_is_cached() {
    let http = mock();
    let client = FormsClient::from_service_account_json(context(&http, &[]), SA_JSON)
        .await
        .unwrap();
    assert!(!client.is_authenticated().await);
    assert!(http.requests().is_empty());

    client.get_form("f1").await.unwrap();
    assert!(client.is_authenticated().await);
    assert_eq!(http.count(TOKEN_PATH), 1);
}

#[tokio::test]
async fn test_json_and_file_clients_behave_alike() {
    let from_json = mock();
    let client = FormsClient::from_service_account_json(context(&from_json, &[]), SA_JSON)
        .await
        .unwrap();
    let json_form = client.get_form("f1").await.unwrap();

    let from_file = mock();
    let client = FormsClient::from_service_account_file(
        context(&from_file, &[]),
        testdata("service_account.json"),
    )
    .await
    .unwrap();
    let file_form = client.get_form("f1").await.unwrap();

    assert_eq!(json_form, file_form);
    let shape = |http: &MockHttpSend| {
        http.requests()
            .into_iter()
            .map(|r| (r.method, r.uri, r.authorization))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&from_json), shape(&from_file));
}

#[tokio::test]
async fn test_factory_ignores_ambient_config() {
    let http = mock();
    let client = FormsClient::from_service_account_json(
        context(&http, &[("GOOGLE_API_KEY", "k1")]),
        SA_JSON,
    )
    .await
    .unwrap();

    assert_eq!(client.mode(), CredentialMode::ServiceAccount);
}

#[tokio::test]
async fn test_missing_key_file_fails_at_build() {
    let http = mock();
    let err = FormsClient::from_service_account_file(
        context(&http, &[]),
        testdata("does_not_exist.json"),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_eq!(err.context_value("mode"), Some("service_account"));
    assert_eq!(err.context_value("input"), Some("service_account_path"));
}

#[tokio::test]
async fn test_malformed_env_json_fails_at_build() {
    let http = mock();
    let err = FormsClient::from_env(context(
        &http,
        &[("GOOGLE_SERVICE_ACCOUNT_JSON", r#"{"type":"authorized_user"}"#)],
    ))
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert_eq!(
        err.context_value("input"),
        Some("GOOGLE_SERVICE_ACCOUNT_JSON")
    );
}

#[tokio::test]
async fn test_invalid_private_key_in_env_fails_at_build() {
    let http = mock();
    let err = FormsClient::from_env(context(
        &http,
        &[(
            "GOOGLE_SERVICE_ACCOUNT_JSON",
            r#"{"type":"service_account","private_key":"not a pem","client_email":"a@b.c"}"#,
        )],
    ))
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert_eq!(
        err.context_value("input"),
        Some("GOOGLE_SERVICE_ACCOUNT_JSON")
    );
    assert_eq!(err.context_value("client_email"), Some("a@b.c"));
    assert_eq!(err.context_value("mode"), Some("service_account"));
}

#[tokio::test]
async fn test_rejected_grant_is_credential_error() {
    let http = MockHttpSend::new().route(
        TOKEN_PATH,
        400,
        r#"{"error":"invalid_grant","error_description":"Invalid JWT Signature."}"#,
    );
    let client = FormsClient::from_service_account_json(context(&http, &[]), SA_JSON)
        .await
        .unwrap();

    let err = client.get_form("f1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(err.message().contains("invalid_grant"));
    assert_eq!(err.context_value("mode"), Some("service_account"));
    assert_eq!(http.count("/v1/forms/f1"), 0);
}

#[tokio::test]
async fn test_status_mapping() {
    let http = MockHttpSend::new()
        .route(TOKEN_PATH, 200, TOKEN_RESPONSE)
        .route("/v1/forms/denied", 401, "{}")
        .route("/v1/forms/hidden", 403, "{}")
        .route("/v1/forms/broken", 500, "oops");
    let client = FormsClient::from_service_account_json(context(&http, &[]), SA_JSON)
        .await
        .unwrap();

    let kind = |id: &'static str| {
        let client = client.clone();
        async move { client.get_form(id).await.unwrap_err().kind() }
    };
    assert_eq!(kind("denied").await, ErrorKind::Unauthenticated);
    assert_eq!(kind("hidden").await, ErrorKind::NotFound);
    assert_eq!(kind("broken").await, ErrorKind::Transport);
    assert_eq!(http.count(TOKEN_PATH), 1);
}

#[test_case(503, r#"{"error":"backend_error"}"#; "unavailable")]
#[test_case(429, "slow down"; "rate limited")]
#[tokio::test]
async fn test_unavailable_token_endpoint_is_transport_error(status: u16, body: &str) {
    let http = MockHttpSend::new()
        .route(TOKEN_PATH, status, body)
        .route("/v1/forms/f1", 200, r#"{"formId":"f1"}"#);
    let client = FormsClient::from_service_account_json(context(&http, &[]), SA_JSON)
        .await
        .unwrap();

    let err = client.get_form("f1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err
        .context_value("status")
        .is_some_and(|v| v.starts_with(&status.to_string())));
    assert_eq!(err.context_value("mode"), Some("service_account"));
    assert_eq!(http.count("/v1/forms/f1"), 0);
    assert!(!client.is_authenticated().await);
}
