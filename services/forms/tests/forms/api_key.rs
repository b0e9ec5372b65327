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

use gforms::{Config, CredentialMode, FormsClient};
use gforms_core::{Authorization, ErrorKind};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::mock::{context, MockHttpSend};

#[tokio::test]
async fn test_get_form_with_api_key() {
    let http = MockHttpSend::new().route("/v1/forms/f1", 200, r#"{"info":{"title":"T"}}"#);
    let client = FormsClient::from_env(context(&http, &[("GOOGLE_API_KEY", "k1")]))
        .await
        .unwrap();
    assert_eq!(client.mode(), CredentialMode::ApiKey);

    let form = client.get_form("f1").await.unwrap();
    assert_eq!(form, json!({"info": {"title": "T"}}));

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, http::Method::GET);
    assert_eq!(requests[0].uri.query(), Some("key=k1"));
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn test_responses_refused_without_request() {
    let http = MockHttpSend::new();
    let client = FormsClient::from_env(context(&http, &[("GOOGLE_API_KEY", "k1")]))
        .await
        .unwrap();

    let err = client.get_form_responses("f1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert_eq!(err.context_value("mode"), Some("api_key"));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_explicit_api_key_overrides_env() {
    let http = MockHttpSend::new().route("/v1/forms/f1", 200, "{}");
    let client = FormsClient::builder()
        .api_key("explicit")
        .build(context(&http, &[("GOOGLE_API_KEY", "k1")]))
        .await
        .unwrap();

    assert_eq!(
        client.authorize().await.unwrap(),
        Authorization::query("key", "explicit")
    );
    client.get_form("f1").await.unwrap();
    assert_eq!(http.requests()[0].uri.query(), Some("key=explicit"));
}

#[tokio::test]
async fn test_form_id_is_a_single_path_segment() {
    let http = MockHttpSend::new().route("/v1/forms/a%20b%2Fc", 200, "{}");
    let client = FormsClient::builder()
        .config(Config::new().with_api_key("k1"))
        .build(context(&http, &[]))
        .await
        .unwrap();

    client.get_form("a b/c").await.unwrap();
    assert_eq!(http.requests()[0].uri.path(), "/v1/forms/a%20b%2Fc");
}

#[tokio::test]
async fn test_custom_endpoint() {
    let http = MockHttpSend::new().route("/forms/f1", 200, "{}");
    let client = FormsClient::builder()
        .config(
            Config::new()
                .with_api_key("k1")
                .with_endpoint("http://127.0.0.1:8080/"),
        )
        .build(context(&http, &[]))
        .await
        .unwrap();

    client.get_form("f1").await.unwrap();
    assert_eq!(
        http.requests()[0].uri.to_string(),
        "http://127.0.0.1:8080/forms/f1?key=k1"
    );
}

#[tokio::test]
async fn test_unknown_form_is_not_found() {
    let http = MockHttpSend::new().route(
        "/v1/forms/missing",
        404,
        r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#,
    );
    let client = FormsClient::from_env(context(&http, &[("GOOGLE_API_KEY", "k1")]))
        .await
        .unwrap();

    let err = client.get_form("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.context_value("form_id"), Some("missing"));
    assert_eq!(
        err.context_value("remote"),
        Some("Requested entity was not found.")
    );
}
