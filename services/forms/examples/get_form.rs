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

//! Fetch a form, and its responses when the credential allows it.
//!
//! ```shell
//! GOOGLE_API_KEY=... cargo run --example get_form -- <form id>
//! ```

use anyhow::{bail, Result};
use gforms::FormsClient;
use gforms_core::{Context, OsEnv};
use gforms_file_tokio::TokioFile;
use gforms_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let Some(form_id) = std::env::args().nth(1) else {
        bail!("usage: get_form <form id>");
    };

    let ctx = Context::new()
        .with_file_read(TokioFile)
        .with_file_write(TokioFile)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = FormsClient::from_env(ctx).await?;
    println!("authenticating with {}", client.mode());

    let form = client.get_form(&form_id).await?;
    match form["info"]["title"].as_str() {
        Some(title) => println!("{form_id}: {title}"),
        None => println!("{}", serde_json::to_string_pretty(&form)?),
    }

    if client.mode().can_read_responses() {
        let responses = client.get_form_responses(&form_id).await?;
        let count = responses["responses"].as_array().map_or(0, Vec::len);
        println!("{count} responses");
    }

    Ok(())
}
