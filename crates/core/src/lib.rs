//! # Corezoid Core
//!
//! Request construction and response correlation, with no I/O of its own.
//!
//! This crate contains:
//! - Operation builders (`codec`)
//! - HMAC-SHA256 request signing (`signature`)
//! - Reference generation for uncorrelated creates (`reference`)
//! - The bounded operation batch (`batch`)
//! - Signed request construction and response decoding (`transport`)
//! - Correlation of results by reference (`response`)
//!
//! ## Architecture Principles
//! - Only depends on `corezoid-domain`
//! - HTTP and wall-clock time are reached through the traits in `ports`
//! - Synchronous: a send blocks the calling thread for the round trip

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod batch;
pub mod codec;
pub mod ports;
pub mod reference;
pub mod response;
pub mod signature;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used items
pub use batch::OperationBatch;
pub use ports::{Clock, HttpTransport, SystemClock};
pub use reference::{ReferenceGenerator, TimestampReferenceGenerator};
pub use response::{ResponseView, ResultRecord};
pub use signature::Signer;
pub use transport::RequestTransport;
