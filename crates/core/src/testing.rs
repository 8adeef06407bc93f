//! Test doubles for the core ports
//!
//! Available to other crates through the `test-utils` feature.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use corezoid_domain::{CorezoidError, HttpRequest, HttpResponse, Result};

use crate::ports::{Clock, HttpTransport};

type ResponseQueue = Arc<Mutex<VecDeque<Result<HttpResponse>>>>;
type RequestLog = Arc<Mutex<Vec<HttpRequest>>>;

/// Scripted [`HttpTransport`] that records every request it receives.
///
/// Responses are served in the order they were pushed. Once the script runs
/// out, every call answers with a connection error.
#[derive(Debug, Clone, Default)]
pub struct MockHttpTransport {
    responses: ResponseQueue,
    requests: RequestLog,
}

impl MockHttpTransport {
    /// Transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an HTTP response with `status` and `body`.
    pub fn push_response(&self, status: u16, body: &str) {
        lock(&self.responses).push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a failure returned instead of a response.
    pub fn push_error(&self, error: CorezoidError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request, if any was sent.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Number of requests sent so far.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl HttpTransport for MockHttpTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse> {
        lock(&self.requests).push(request.clone());
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(CorezoidError::Connection("mock transport has no scripted response".into()))
        })
    }
}

/// [`Clock`] frozen at a fixed number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn unix_seconds(&self) -> i64 {
        self.0
    }
}

// A panic while holding the lock poisons it; the data is still usable for
// assertions.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
