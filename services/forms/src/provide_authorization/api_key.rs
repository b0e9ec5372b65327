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

use async_trait::async_trait;
use gforms_core::utils::Redact;
use gforms_core::{Authorization, Context, Error, ProvideAuthorization, Result};

use crate::constants::API_KEY_QUERY_PARAM;

/// ApiKeyProvider authorizes requests with the `key` query parameter.
///
/// No network or file access happens here.
#[derive(Clone)]
pub struct ApiKeyProvider {
    key: String,
}

impl ApiKeyProvider {
    /// Create a new ApiKeyProvider, rejecting empty keys.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(Error::credential_invalid("api key must not be empty"));
        }
        Ok(Self { key })
    }
}

impl Debug for ApiKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyProvider")
            .field("key", &Redact::from(&self.key))
            .finish()
    }
}

#[async_trait]
impl ProvideAuthorization for ApiKeyProvider {
    async fn provide_authorization(&self, _: &Context) -> Result<Authorization> {
        Ok(Authorization::query(API_KEY_QUERY_PARAM, &self.key))
    }

    async fn is_authenticated(&self) -> bool {
        true
    }
}
