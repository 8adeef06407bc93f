//! Blocking reqwest transport with connection-level retry

use std::time::Duration;

use corezoid_core::HttpTransport;
use corezoid_domain::constants::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use corezoid_domain::{ClientConfig, CorezoidError, HttpRequest, HttpResponse, Result};
use reqwest::blocking::Client as ReqwestClient;
use tracing::{debug, error, warn};

use crate::errors::InfraError;

/// Blocking HTTP transport with bounded, connection-level retry.
///
/// Only exchanges that never produced an HTTP response (timeouts, refused
/// connections, broken requests) are retried. Any status code, 5xx
/// included, is returned to the caller as-is.
///
/// Must not be constructed or called from inside an async runtime; reqwest's
/// blocking client owns its own.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Transport using the timeout and retry budget of `config`.
    ///
    /// # Errors
    /// Returns `CorezoidError::Config` if the underlying client cannot be
    /// built (e.g. TLS backend initialisation failure).
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::builder().timeout(config.timeout).max_retries(config.max_retries).build()
    }

    /// Initial try plus retries.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    fn execute(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, reqwest::Error> {
        let mut builder = self.client.post(&request.url).body(request.body.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse::new(status, body))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }

    fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let attempts = self.max_attempts.max(1);
        let url = request.url.as_str();

        for attempt in 0..attempts {
            debug!(attempt = attempt + 1, %url, "sending HTTP request");

            match self.execute(request) {
                Ok(response) => {
                    debug!(attempt = attempt + 1, %url, status = response.status, "received HTTP response");
                    return Ok(response);
                }
                Err(err) => {
                    if attempt + 1 < attempts && should_retry_error(&err) {
                        warn!(attempt = attempt + 1, %url, error = %err, "HTTP request failed, retrying");
                        self.sleep_with_backoff(attempt + 1);
                        continue;
                    }

                    error!(attempts = attempt + 1, %url, error = %err, "HTTP request failed");
                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(CorezoidError::Connection("http transport exhausted retries without producing a result".into()))
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("max_attempts", &self.max_attempts)
            .field("base_backoff", &self.base_backoff)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    max_retries: u32,
    base_backoff: Duration,
    user_agent: Option<String>,
    use_env_proxy: bool,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
            use_env_proxy: true,
        }
    }
}

impl ReqwestTransportBuilder {
    /// Applied to each attempt as a whole, connect through body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retries after the first attempt; `0` disables retrying.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// First retry delay; doubles on every further attempt.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Ignore `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub fn no_proxy(mut self) -> Self {
        self.use_env_proxy = false;
        self
    }

    /// # Errors
    /// Returns `CorezoidError::Config` if the reqwest client cannot be built.
    pub fn build(self) -> Result<ReqwestTransport> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| concat!("corezoid-rust/", env!("CARGO_PKG_VERSION")).to_string());
        let mut builder = ReqwestClient::builder().timeout(self.timeout).user_agent(user_agent);

        if !self.use_env_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(|err| {
            CorezoidError::Config(format!("failed to build HTTP client: {err}"))
        })?;

        Ok(ReqwestTransport {
            client,
            max_attempts: (self.max_retries as usize).saturating_add(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
