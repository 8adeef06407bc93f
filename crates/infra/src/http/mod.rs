//! HTTP transport implementations

pub mod client;

pub use client::{ReqwestTransport, ReqwestTransportBuilder};
