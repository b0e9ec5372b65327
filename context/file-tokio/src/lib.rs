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

//! Tokio based file access for gforms.
//!
//! [`TokioFile`] implements both [`FileRead`] and [`FileWrite`], so a single
//! value can back service account loading and token persistence:
//!
//! ```no_run
//! use gforms_core::Context;
//! use gforms_file_tokio::TokioFile;
//!
//! let ctx = Context::new()
//!     .with_file_read(TokioFile)
//!     .with_file_write(TokioFile);
//! ```

use std::path::Path;

use async_trait::async_trait;
use gforms_core::{Error, FileRead, FileWrite, Result};
use log::debug;

/// File access backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFile;

#[async_trait]
impl FileRead for TokioFile {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            Error::unexpected("failed to read file")
                .with_context("path", path)
                .with_source(e)
        })
    }
}

#[async_trait]
impl FileWrite for TokioFile {
    async fn file_write(&self, path: &str, content: &[u8]) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::unexpected("failed to create parent directory")
                        .with_context("path", path)
                        .with_source(e)
                })?;
            }
        }

        debug!("writing {} bytes to {path}", content.len());
        tokio::fs::write(path, content).await.map_err(|e| {
            Error::unexpected("failed to write file")
                .with_context("path", path)
                .with_source(e)
        })
    }
}
