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
use std::mem;
use std::str::FromStr;

use http::header;
use http::uri::PathAndQuery;
use http::{HeaderValue, Uri};

use crate::utils::Redact;
use crate::Result;

/// Authorization attached to an outgoing request.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// A query parameter, such as `key=<api key>`.
    Query {
        /// Parameter name.
        name: String,
        /// Parameter value.
        value: String,
    },
    /// A bearer token sent in the `Authorization` header.
    Bearer(String),
}

impl Authorization {
    /// Authorize through a query parameter.
    pub fn query(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Query {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Authorize through a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Apply the authorization to http::request::Parts.
    ///
    /// Existing query parameters and headers are kept.
    pub fn apply(&self, parts: &mut http::request::Parts) -> Result<()> {
        match self {
            Authorization::Query { name, value } => {
                let mut uri = mem::take(&mut parts.uri).into_parts();
                let paq = uri
                    .path_and_query
                    .unwrap_or_else(|| PathAndQuery::from_static("/"));

                let mut query =
                    form_urlencoded::Serializer::new(paq.query().unwrap_or_default().to_string());
                query.append_pair(name, value);

                let paq = format!("{}?{}", paq.path(), query.finish());
                uri.path_and_query = Some(PathAndQuery::from_str(&paq)?);
                parts.uri = Uri::from_parts(uri)?;
            }
            Authorization::Bearer(token) => {
                let mut value: HeaderValue = format!("Bearer {token}").parse()?;
                value.set_sensitive(true);
                parts.headers.insert(header::AUTHORIZATION, value);
            }
        }

        Ok(())
    }
}

impl Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::Query { name, value } => f
                .debug_struct("Query")
                .field("name", name)
                .field("value", &Redact::from(value))
                .finish(),
            Authorization::Bearer(token) => {
                f.debug_tuple("Bearer").field(&Redact::from(token)).finish()
            }
        }
    }
}
