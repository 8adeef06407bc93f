//! Configuration loader
//!
//! Resolves a [`ClientConfig`] from three layers, highest precedence first:
//! 1. Explicit values carried by [`ConfigOverrides`] (constructor arguments
//!    or a config file)
//! 2. Environment variables
//! 3. Built-in defaults
//!
//! ## Environment Variables
//! - `COREZOID_API_LOGIN`: API login
//! - `COREZOID_API_SECRET`: API secret
//! - `COREZOID_API_URL`: endpoint URL
//! - `COREZOID_TIMEOUT`: HTTP timeout in whole seconds
//! - `COREZOID_MAX_RETRIES`: connection-level retries after the first attempt
//!
//! Empty variables, and empty explicit values, are treated as unset.
//!
//! ## Files
//! [`load_from_file`] reads JSON or TOML (detected by extension) into a
//! [`ConfigOverrides`]; keys left out of the file still resolve from the
//! environment and defaults.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use corezoid_domain::constants::{
    DEFAULT_API_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, ENV_API_LOGIN, ENV_API_SECRET,
    ENV_API_URL, ENV_MAX_RETRIES, ENV_TIMEOUT,
};
use corezoid_domain::{ClientConfig, CorezoidError, Result};
use serde::{Deserialize, Deserializer};

/// Explicitly supplied settings; `None` defers to the environment.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    /// API login.
    pub api_login: Option<String>,
    /// API secret.
    pub api_secret: Option<String>,
    /// Endpoint URL.
    pub api_url: Option<String>,
    /// Whole seconds in config files.
    #[serde(deserialize_with = "optional_secs")]
    pub timeout: Option<Duration>,
    /// Retry count.
    pub max_retries: Option<u32>,
}

impl ConfigOverrides {
    /// No explicit values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the login.
    pub fn api_login(mut self, login: impl Into<String>) -> Self {
        self.api_login = Some(login.into());
        self
    }

    /// Set the secret.
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// Set the endpoint URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the retry count.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

impl std::fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("api_login", &self.api_login)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Resolve against the process environment.
///
/// # Errors
/// Returns `CorezoidError::Config` if a numeric variable cannot be parsed or
/// the resolved credentials are missing.
pub fn resolve(overrides: ConfigOverrides) -> Result<ClientConfig> {
    resolve_with(overrides, |key| std::env::var(key).ok())
}

/// Resolve with a caller-supplied variable lookup.
///
/// # Errors
/// See [`resolve`].
pub fn resolve_with<F>(overrides: ConfigOverrides, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| lookup(key).and_then(non_blank);

    let api_login = overrides.api_login.and_then(non_blank).or_else(|| env(ENV_API_LOGIN)).unwrap_or_default();
    let api_secret =
        overrides.api_secret.and_then(non_blank).or_else(|| env(ENV_API_SECRET)).unwrap_or_default();
    let api_url = overrides
        .api_url
        .and_then(non_blank)
        .or_else(|| env(ENV_API_URL))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let timeout = match overrides.timeout {
        Some(timeout) => timeout,
        None => Duration::from_secs(
            env(ENV_TIMEOUT).map(|raw| parse_number(ENV_TIMEOUT, &raw)).transpose()?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
    };
    let max_retries = match overrides.max_retries {
        Some(retries) => retries,
        None => env(ENV_MAX_RETRIES)
            .map(|raw| parse_number(ENV_MAX_RETRIES, &raw))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_RETRIES),
    };

    let config = ClientConfig { api_login, api_secret, api_url, timeout, max_retries };
    config.validate()?;

    tracing::debug!(api_url = %config.api_url, timeout_secs = config.timeout.as_secs(), max_retries, "configuration resolved");
    Ok(config)
}

/// Load explicit settings from a JSON or TOML file.
///
/// # Errors
/// Returns `CorezoidError::Config` if the file is missing, unreadable, of an
/// unsupported format, or does not parse.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<ConfigOverrides> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CorezoidError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| CorezoidError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, path)
}

/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ConfigOverrides> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CorezoidError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CorezoidError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CorezoidError::Config(format!("Unsupported config format: {}", extension))),
    }
}

// Blank values, explicit or from the environment, count as unset.
fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| CorezoidError::Config(format!("Invalid value for {}: {}", key, e)))
}

fn optional_secs<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error> {
    Option::<u64>::deserialize(deserializer).map(|secs| secs.map(Duration::from_secs))
}
