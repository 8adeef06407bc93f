//! Client configuration

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::errors::{CorezoidError, Result};

/// Connection settings for one client.
///
/// Immutable once handed to a client; [`ClientConfig::validate`] is run at
/// client construction.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API login sent in `X-API-Login`.
    pub api_login: String,
    /// Shared signing secret; never sent or logged.
    pub api_secret: String,
    /// JSON API endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Applied to the whole HTTP exchange, serialized as whole seconds.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
    /// Connection-level retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl ClientConfig {
    /// Configuration with the given credentials and built-in defaults for
    /// everything else.
    pub fn new(api_login: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_login: api_login.into(),
            api_secret: api_secret.into(),
            api_url: default_api_url(),
            timeout: default_timeout(),
            max_retries: default_max_retries(),
        }
    }

    /// Replace the endpoint URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Replace the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Check that the credentials are present.
    ///
    /// # Errors
    /// Returns `CorezoidError::Config` if the login, secret or URL is empty.
    pub fn validate(&self) -> Result<()> {
        if self.api_login.trim().is_empty() {
            return Err(CorezoidError::Config("API login is required".into()));
        }
        if self.api_secret.trim().is_empty() {
            return Err(CorezoidError::Config("API secret is required".into()));
        }
        if self.api_url.trim().is_empty() {
            return Err(CorezoidError::Config("API URL must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_login", &self.api_login)
            .field("api_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
