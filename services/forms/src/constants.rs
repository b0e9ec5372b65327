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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Env values used by the forms client.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const GOOGLE_SERVICE_ACCOUNT_PATH: &str = "GOOGLE_SERVICE_ACCOUNT_PATH";
pub const GOOGLE_SERVICE_ACCOUNT_JSON: &str = "GOOGLE_SERVICE_ACCOUNT_JSON";
pub const USE_SERVICE_ACCOUNT: &str = "USE_SERVICE_ACCOUNT";
pub const GOOGLE_CLIENT_SECRETS_PATH: &str = "GOOGLE_CLIENT_SECRETS_PATH";
pub const GOOGLE_TOKEN_PATH: &str = "GOOGLE_TOKEN_PATH";

// Names of explicit constructor arguments, as reported in errors.
pub const ARG_SERVICE_ACCOUNT_PATH: &str = "service_account_path";
pub const ARG_SERVICE_ACCOUNT_JSON: &str = "service_account_json";
pub const ARG_FORCE_SERVICE_ACCOUNT: &str = "force_service_account";

pub const DEFAULT_ENDPOINT: &str = "https://forms.googleapis.com/v1";
pub const DEFAULT_TOKEN_PATH: &str = "token.json";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub const SCOPE_FORMS_BODY_READONLY: &str = "https://www.googleapis.com/auth/forms.body.readonly";
pub const SCOPE_FORMS_RESPONSES_READONLY: &str =
    "https://www.googleapis.com/auth/forms.responses.readonly";

pub const API_KEY_QUERY_PARAM: &str = "key";
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Lifetime requested for service account assertions, in seconds.
pub const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Tokens expiring within this many seconds are treated as expired.
pub const TOKEN_EXPIRY_BUFFER_SECS: i64 = 2 * 60;

/// AsciiSet for a single path segment such as a form id.
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
