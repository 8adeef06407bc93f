//! # Corezoid Infrastructure
//!
//! Implementations of the `corezoid-core` ports that touch the outside
//! world.
//!
//! This crate contains:
//! - The blocking `reqwest` transport with connection-level retry (`http`)
//! - Configuration resolution from arguments, environment and files
//!   (`config`)
//! - `reqwest` error conversion (`errors`)
//! - Optional `tracing-subscriber` setup (`logging`)
//!
//! ## Architecture
//! - Implements traits defined in `corezoid-core`
//! - Contains all "impure" code (network, environment, filesystem)

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod errors;
pub mod http;
pub mod logging;

// Re-export commonly used items
pub use config::ConfigOverrides;
pub use errors::InfraError;
pub use http::{ReqwestTransport, ReqwestTransportBuilder};
