//! # Corezoid Domain
//!
//! Wire and configuration types for the Corezoid SDK.
//!
//! This crate contains:
//! - Request operations and response acknowledgements
//! - Request/response envelopes and HTTP exchange data
//! - Client configuration
//! - The SDK error type and Result alias
//! - Wire constants and defaults
//!
//! ## Architecture
//! - No dependencies on other SDK crates
//! - No I/O

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::ClientConfig;
pub use errors::*;
pub use types::*;
