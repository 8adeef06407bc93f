//! Example: sending several operations in one signed request
//!
//! Creates three tasks in one batch, then reuses the batch to mark each
//! created task as processed.
//!
//! ```bash
//! cargo run -p corezoid --example batch_operations
//! ```

use anyhow::Context;
use corezoid::prelude::*;
use serde_json::json;

fn payload(value: serde_json::Value) -> TaskData {
    value.as_object().cloned().unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    corezoid::logging::init(None);

    let conv_id = std::env::var("COREZOID_CONV_ID").context("COREZOID_CONV_ID is not set")?;
    let client = CorezoidClient::from_env()?;

    let mut batch = client.create_batch_with_capacity(10);
    let mut references = Vec::new();
    for i in 0..3 {
        let reference = batch.add_create(
            conv_id.as_str(),
            payload(json!({"customer_id": format!("customer-{i}"), "amount": 100.5 + f64::from(i)})),
            None,
        )?;
        println!("Added task with reference: {reference}");
        references.push(reference);
    }

    println!("Sending batch with {} operations...", batch.size());
    let response = client.send_batch(&batch)?;
    if !response.is_success() {
        anyhow::bail!("batch rejected: {}", response.error_message().unwrap_or("unknown error"));
    }

    batch.clear();
    for reference in &references {
        match response.status_for(reference) {
            Some(status) if status.is_ok() => {
                batch.add_modify_by_ref(conv_id.as_str(), reference.as_str(), payload(json!({"status": "processed"})))?;
            }
            other => println!("Task {reference} was not created: {other:?}"),
        }
    }

    if batch.is_empty() {
        return Ok(());
    }

    let response = client.send_batch(&batch)?;
    for result in response.results() {
        println!("{}", serde_json::Value::Object(result.clone()));
    }

    Ok(())
}
