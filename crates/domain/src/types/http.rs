//! Data exchanged with the HTTP transport port

use crate::constants::{
    CONTENT_TYPE_JSON, HEADER_API_LOGIN, HEADER_API_SIGNATURE, HEADER_API_TIMESTAMP,
    HEADER_CONTENT_TYPE,
};

/// Authentication headers, computed fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Value of `X-API-Login`.
    pub api_login: String,
    /// Lowercase hex HMAC-SHA256 over `timestamp || body`.
    pub signature: String,
    /// Whole seconds since the Unix epoch, as a decimal string
    pub timestamp: String,
}

impl AuthHeaders {
    /// Header name/value pairs in the order they are sent.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON.to_string()),
            (HEADER_API_LOGIN, self.api_login.clone()),
            (HEADER_API_SIGNATURE, self.signature.clone()),
            (HEADER_API_TIMESTAMP, self.timestamp.clone()),
        ]
    }
}

/// A fully prepared POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Endpoint URL.
    pub url: String,
    /// Canonical JSON envelope, exactly as signed.
    pub body: String,
    /// Header name/value pairs.
    pub headers: Vec<(&'static str, String)>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Response with `status` and `body`.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
