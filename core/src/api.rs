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

use crate::{Authorization, Context, Result};
use std::fmt::Debug;

/// CachedCredential is implemented by short-lived credentials that can be
/// reused until they expire.
pub trait CachedCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential can still be presented.
    fn is_valid(&self) -> bool;
}

impl<T: CachedCredential> CachedCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideAuthorization turns credential material into the authorization of
/// an outgoing request.
///
/// Each authentication mode has exactly one implementation. Implementations
/// own whatever cache they need; callers never branch on the mode.
#[async_trait::async_trait]
pub trait ProvideAuthorization: Debug + Send + Sync + 'static {
    /// Produce the authorization to attach to the next request.
    async fn provide_authorization(&self, ctx: &Context) -> Result<Authorization>;

    /// Check whether an authorization can be presented without contacting
    /// any authority.
    async fn is_authenticated(&self) -> bool {
        false
    }
}
