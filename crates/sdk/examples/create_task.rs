//! Example: creating a single task
//!
//! Reads credentials from `COREZOID_API_LOGIN` / `COREZOID_API_SECRET` (a
//! `.env` file in the working directory is honoured) and the target process
//! from `COREZOID_CONV_ID`.
//!
//! ```bash
//! RUST_LOG=corezoid=debug cargo run -p corezoid --example create_task
//! ```

use anyhow::Context;
use corezoid::prelude::*;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    corezoid::logging::init(Some("corezoid=info"));

    let conv_id = std::env::var("COREZOID_CONV_ID").context("COREZOID_CONV_ID is not set")?;
    let client = CorezoidClient::from_env()?;

    let data = json!({
        "customer_id": "12345",
        "amount": 100.50,
        "currency": "USD"
    });
    let data: TaskData = data.as_object().cloned().unwrap_or_default();

    let response = client.create_task(conv_id.as_str(), data, Some("order-12345".into()))?;

    if response.is_success() {
        println!("Task created: {:?}", response.result_for("order-12345"));
        println!("Engine id: {:?}", response.object_id_for("order-12345"));
    } else {
        println!("Engine rejected the task: {}", response.error_message().unwrap_or("unknown error"));
    }

    Ok(())
}
