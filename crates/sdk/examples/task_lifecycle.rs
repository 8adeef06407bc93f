//! Example: create, modify and read back one task with the convenience
//! helpers
//!
//! Settings come from a config file when `COREZOID_CONFIG` points at one,
//! with the environment filling any gaps.
//!
//! ```bash
//! COREZOID_CONFIG=corezoid.toml cargo run -p corezoid --example task_lifecycle
//! ```

use anyhow::Context;
use corezoid::prelude::*;
use corezoid::ConfigOverrides;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    corezoid::logging::init(Some("corezoid=debug"));

    let overrides = match std::env::var("COREZOID_CONFIG") {
        Ok(path) => corezoid::load_from_file(path)?,
        Err(_) => ConfigOverrides::default(),
    };
    let client = CorezoidClient::from_overrides(overrides)?;
    let conv_id = std::env::var("COREZOID_CONV_ID").context("COREZOID_CONV_ID is not set")?;

    let data = json!({"customer_id": "12345", "amount": 42}).as_object().cloned().unwrap_or_default();
    let created = client.create_task(conv_id.as_str(), data, None)?;
    let reference = created
        .results()
        .first()
        .and_then(|result| result.get("ref"))
        .and_then(|value| value.as_str())
        .map(str::to_owned)
        .context("engine did not echo a reference")?;
    println!("Created task {reference}");

    let update = json!({"status": "processed"}).as_object().cloned().unwrap_or_default();
    let modified = client.modify_task(conv_id.as_str(), reference.as_str(), update)?;
    println!("Modify accepted: {}", modified.is_success());

    let fetched = client.get_task(conv_id.as_str(), reference.as_str())?;
    println!("{fetched}");

    if let Some(obj_id) = created.object_id_for(&reference) {
        let by_id = client.get_task_by_id(conv_id.as_str(), obj_id)?;
        println!("Fetched by id: {:?}", by_id.result_for(&reference));
    }

    Ok(())
}
