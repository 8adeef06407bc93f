//! # Corezoid
//!
//! Synchronous client for the Corezoid process engine JSON API.
//!
//! Operations are collected into a bounded [`OperationBatch`] (or sent one at
//! a time), serialized into a single `{"ops":[...]}` envelope, signed with
//! HMAC-SHA256 over `timestamp || body`, and posted to one endpoint. Results
//! come back in a [`ResponseView`] and are looked up by the `ref` each
//! operation carried.
//!
//! ```no_run
//! use corezoid::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> corezoid::Result<()> {
//! let client = CorezoidClient::new(ClientConfig::new("login", "secret"))?;
//!
//! let mut batch = client.create_batch();
//! let reference = batch.add_create("12345", json!({"amount": 10}).as_object().cloned().unwrap_or_default(), None)?;
//!
//! let response = client.send_batch(&batch)?;
//! if response.is_success() {
//!     println!("{:?}", response.result_for(&reference));
//! } else {
//!     eprintln!("engine rejected the batch: {:?}", response.error_message());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Logging goes through `tracing`; call [`logging::init`] or install your own
//! subscriber to see it.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod client;

pub use client::{CorezoidClient, CorezoidClientBuilder};
pub use corezoid_core::{
    codec, signature, Clock, HttpTransport, OperationBatch, ReferenceGenerator, ResponseView,
    ResultRecord, Signer, SystemClock, TimestampReferenceGenerator,
};
pub use corezoid_domain::{
    constants, ClientConfig, ConvId, CorezoidError, ObjectKind, Operation, OperationKind,
    OperationResult, ProcStatus, Result, SchemaUpload, TaskData, TaskIdentity, TaskOperation,
};
pub use corezoid_infra::config::{load_from_file, ConfigOverrides};
pub use corezoid_infra::{logging, ReqwestTransport};

#[cfg(feature = "test-utils")]
pub use corezoid_core::testing;

/// Everything needed for everyday use.
pub mod prelude {
    pub use crate::{
        ClientConfig, CorezoidClient, CorezoidError, OperationBatch, ResponseView, TaskData,
    };
}
