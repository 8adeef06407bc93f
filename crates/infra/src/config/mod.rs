//! Configuration loading and management
//!
//! This module resolves client configuration from explicit values,
//! environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load_from_file, resolve, resolve_with, ConfigOverrides};
