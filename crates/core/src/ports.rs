//! Port interfaces implemented outside the core
//!
//! The core never performs I/O itself: HTTP goes through [`HttpTransport`]
//! and wall-clock time through [`Clock`].

use corezoid_domain::{HttpRequest, HttpResponse, Result};

/// Blocking HTTP POST collaborator.
///
/// Implementations own connection pooling, TLS, the timeout and the
/// connection-level retry budget.
pub trait HttpTransport: Send + Sync {
    /// Perform the exchange.
    ///
    /// # Errors
    /// Returns `CorezoidError::Connection` when no HTTP response could be
    /// obtained (refused connection, timeout, TLS failure) after all
    /// retries. Any completed exchange, whatever its status, is `Ok`.
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Source of the current time in whole seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// Current time, truncated to the second.
    fn unix_seconds(&self) -> i64;
}

/// [`Clock`] backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
