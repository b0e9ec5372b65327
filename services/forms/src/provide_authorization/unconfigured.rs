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

use gforms_core::{Authorization, Context, Error, ProvideAuthorization, Result};

use crate::credential::CredentialMode;

/// Why resolution found no usable credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnconfiguredReason {
    /// No credential material was configured at all.
    NoCredentials,
    /// Service account auth was required, by the named flag, but no service
    /// account was given.
    ServiceAccountForced(&'static str),
}

impl UnconfiguredReason {
    /// The error every call reports in this state.
    pub fn error(self) -> Error {
        let err = match self {
            UnconfiguredReason::NoCredentials => Error::unauthenticated(
                "no credentials configured: set an api key, a service account or client secrets",
            ),
            UnconfiguredReason::ServiceAccountForced(flag) => Error::config_invalid(
                "service account authentication is required but no service account path or json is configured",
            )
            .with_context("input", flag),
        };
        err.with_context("mode", CredentialMode::Unconfigured)
    }
}

/// UnconfiguredProvider fails every call.
///
/// Building a client never fails for missing credentials; using it does.
#[derive(Debug, Clone, Copy)]
pub struct UnconfiguredProvider {
    reason: UnconfiguredReason,
}

impl UnconfiguredProvider {
    /// Create a provider failing with `reason`.
    pub fn new(reason: UnconfiguredReason) -> Self {
        Self { reason }
    }
}

#[async_trait]
impl ProvideAuthorization for UnconfiguredProvider {
    async fn provide_authorization(&self, _: &Context) -> Result<Authorization> {
        Err(self.reason.error())
    }
}
