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

use async_trait::async_trait;
use log::{debug, warn};

use gforms_core::{Context, Error, Result};

use crate::credential::DelegatedToken;

/// TokenStore persists the delegated OAuth2 token across process runs.
#[async_trait]
pub trait TokenStore: Debug + Send + Sync + 'static {
    /// Load the stored token, `None` if there is no usable token.
    async fn load(&self, ctx: &Context) -> Result<Option<DelegatedToken>>;

    /// Replace the stored token.
    async fn save(&self, ctx: &Context, token: &DelegatedToken) -> Result<()>;

    /// Human readable location used in diagnostics.
    fn location(&self) -> &str;
}

/// FileTokenStore keeps the token as a JSON blob at a path.
///
/// Reads and writes go through the context's file components.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: String,
}

impl FileTokenStore {
    /// Create a store at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self, ctx: &Context) -> Result<Option<DelegatedToken>> {
        let content = match ctx.file_read(&self.path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("no stored token at {}: {err}", self.path);
                return Ok(None);
            }
        };

        match serde_json::from_slice(&content) {
            Ok(token) => Ok(Some(token)),
            Err(err) => {
                warn!("ignoring unreadable token file {}: {err}", self.path);
                Ok(None)
            }
        }
    }

    async fn save(&self, ctx: &Context, token: &DelegatedToken) -> Result<()> {
        let content = serde_json::to_vec_pretty(token).map_err(|e| {
            Error::unexpected("failed to serialize delegated token").with_source(e)
        })?;
        ctx.file_write(&self.path, &content).await
    }

    fn location(&self) -> &str {
        &self.path
    }
}
