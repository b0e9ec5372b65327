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

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use gforms_core::{Context, HttpSend, Result, StaticEnv};
use gforms_file_tokio::TokioFile;
use http::StatusCode;

pub const SA_JSON: &str = include_str!("../../testdata/service_account.json");

pub const TOKEN_RESPONSE: &str =
    r#"{"access_token":"sa-token","expires_in":3600,"token_type":"Bearer"}"#;

/// A request seen by [`MockHttpSend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: http::Method,
    pub uri: http::Uri,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Debug, Default)]
struct State {
    routes: Vec<(String, StatusCode, String)>,
    requests: Vec<Recorded>,
}

/// HttpSend answering from canned routes keyed by uri path.
///
/// Unknown paths answer 404 with an empty object.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    state: Arc<Mutex<State>>,
}

impl MockHttpSend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, path: &str, status: u16, body: &str) -> Self {
        self.state.lock().unwrap().routes.push((
            path.to_string(),
            StatusCode::from_u16(status).unwrap(),
            body.to_string(),
        ));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.uri.path() == path)
            .count()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded {
            method: req.method().clone(),
            uri: req.uri().clone(),
            authorization: req
                .headers()
                .get(http::header::AUTHORIZATION)
                .map(|v| v.to_str().unwrap().to_string()),
            body: String::from_utf8_lossy(req.body()).into_owned(),
        });

        let (status, body) = state
            .routes
            .iter()
            .find(|(path, _, _)| path == req.uri().path())
            .map(|(_, status, body)| (*status, body.clone()))
            .unwrap_or((StatusCode::NOT_FOUND, "{}".to_string()));

        Ok(http::Response::builder()
            .status(status)
            .body(Bytes::from(body))
            .unwrap())
    }
}

pub fn context(http: &MockHttpSend, envs: &[(&str, &str)]) -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new()
        .with_file_read(TokioFile)
        .with_file_write(TokioFile)
        .with_http_send(http.clone())
        .with_env(envs.iter().copied().collect::<StaticEnv>())
}

pub fn testdata(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
        .to_string_lossy()
        .into_owned()
}
