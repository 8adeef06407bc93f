//! Example: uploading a process scheme into a folder
//!
//! ```bash
//! COREZOID_FOLDER_ID=123 cargo run -p corezoid --example upload_schema
//! ```

use anyhow::Context;
use corezoid::prelude::*;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    corezoid::logging::init(None);

    let folder_id = std::env::var("COREZOID_FOLDER_ID").context("COREZOID_FOLDER_ID is not set")?;
    let client = CorezoidClient::from_env()?;

    let scheme = json!([{
        "title": "Example Process",
        "description": "A simple example process",
        "nodes": [
            {"id": "start", "type": "start", "title": "Start"},
            {"id": "end", "type": "end", "title": "End"}
        ],
        "edges": [{"source": "start", "target": "end"}]
    }]);

    let response = client.upload_schema(folder_id.as_str(), scheme.to_string(), false)?;
    println!("{response}");

    Ok(())
}
