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
use std::future::Future;

use tokio::sync::Mutex;

use crate::{CachedCredential, Result};

/// CredentialCache holds one short-lived credential for a single owner.
///
/// The slot stays locked while a refresh is running, so concurrent callers
/// wait for that refresh instead of starting their own, and every caller sees
/// either the previous valid credential or the new one.
pub struct CredentialCache<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Default for CredentialCache<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Debug> Debug for CredentialCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.try_lock() {
            Ok(slot) => f.debug_struct("CredentialCache").field("slot", &*slot).finish(),
            Err(_) => f
                .debug_struct("CredentialCache")
                .field("slot", &"<refreshing>")
                .finish(),
        }
    }
}

impl<T: CachedCredential> CredentialCache<T> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache seeded with a credential.
    pub fn with_value(value: T) -> Self {
        Self {
            slot: Mutex::new(Some(value)),
        }
    }

    /// Return the cached credential if it is still valid, otherwise run
    /// `refresh` and store its result.
    ///
    /// `refresh` receives the stale credential, if any. On failure the stale
    /// credential is kept and the error is returned unchanged.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<T>
    where
        F: FnOnce(Option<T>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(cred) = slot.as_ref() {
            if cred.is_valid() {
                return Ok(cred.clone());
            }
        }

        let fresh = refresh(slot.clone()).await?;
        *slot = Some(fresh.clone());
        Ok(fresh)
    }

    /// Return the cached credential without validating it.
    pub async fn peek(&self) -> Option<T> {
        self.slot.lock().await.clone()
    }
}
