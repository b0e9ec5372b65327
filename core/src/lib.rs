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

//! Core components for authenticating Google Forms API requests.
//!
//! This crate provides the foundational types and traits shared by the gforms
//! workspace. It knows nothing about forms; it only defines how credentials are
//! turned into request authorization and how the outside world (files, HTTP,
//! environment) is reached.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for file access, HTTP sending, and environment access
//! - **Traits**: [`ProvideAuthorization`] produces the [`Authorization`] for an outgoing request
//! - **Cache**: [`CredentialCache`] keeps a short-lived credential and refreshes it at most once at a time
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use gforms_core::{Authorization, Context, ProvideAuthorization, Result};
//!
//! #[derive(Debug)]
//! struct StaticBearer(String);
//!
//! #[async_trait]
//! impl ProvideAuthorization for StaticBearer {
//!     async fn provide_authorization(&self, _: &Context) -> Result<Authorization> {
//!         Ok(Authorization::bearer(&self.0))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new();
//! let auth = StaticBearer("token".to_string())
//!     .provide_authorization(&ctx)
//!     .await?;
//!
//! let mut parts = http::Request::builder()
//!     .method("GET")
//!     .uri("https://forms.googleapis.com/v1/forms/abc")
//!     .body(())?
//!     .into_parts()
//!     .0;
//! auth.apply(&mut parts)?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, NoopEnv, NoopFileRead, NoopFileWrite, NoopHttpSend};
mod fs;
pub use fs::{FileRead, FileWrite};
mod http_send;
pub use http_send::HttpSend;
mod env;
pub use env::{Env, OsEnv, StaticEnv};

mod api;
pub use api::{CachedCredential, ProvideAuthorization};
mod authorization;
pub use authorization::Authorization;
mod cache;
pub use cache::CredentialCache;
