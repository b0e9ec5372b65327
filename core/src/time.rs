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

//! Time related utils.

use chrono::{TimeDelta, Utc};

/// DateTime is the UTC timestamp used across gforms.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// The instant `secs` seconds from now, saturating far in the future.
///
/// Token endpoints report lifetimes as `expires_in` seconds; this turns them
/// into absolute expiry timestamps.
pub fn after_secs(secs: u64) -> DateTime {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| now().checked_add_signed(delta))
        .unwrap_or(DateTime::MAX_UTC)
}

/// Check whether `expires_at` is still more than `buffer_secs` away.
///
/// `None` means the credential never expires.
pub fn is_unexpired(expires_at: Option<DateTime>, buffer_secs: i64) -> bool {
    let Some(expires_at) = expires_at else {
        return true;
    };

    match TimeDelta::try_seconds(buffer_secs) {
        Some(buffer) => now() + buffer < expires_at,
        None => false,
    }
}
