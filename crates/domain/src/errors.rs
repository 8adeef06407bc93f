//! Error types used throughout the SDK

use thiserror::Error;

/// Main error type for the Corezoid SDK
///
/// Business failures reported by the engine (`request_proc == "error"`) are
/// not errors: they come back as a normal response the caller branches on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorezoidError {
    /// Missing or invalid client configuration (raised at construction)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied an unusable request, e.g. an empty batch
    #[error("Validation error: {0}")]
    Validation(String),

    /// A batch refused another operation because it is full
    #[error("Batch is full (max size: {max_batch_size})")]
    CapacityExceeded {
        /// Capacity of the batch that refused the operation
        max_batch_size: usize,
    },

    /// The HTTP exchange could not be completed after all retries
    #[error("Connection error: {0}")]
    Connection(String),

    /// The engine answered with a non-2xx status
    #[error("API error: HTTP {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The engine answered but the body was not a usable JSON document
    #[error("Malformed response: {reason}")]
    MalformedResponse {
        /// What made the body unusable
        reason: String,
        /// Raw response body
        body: String,
    },

    /// A request could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CorezoidError {
    /// Stable label suitable for structured logging fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::Connection(_) => "connection",
            Self::Api { .. } => "api",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Whether resubmitting the same request could plausibly succeed.
    ///
    /// The SDK itself never resubmits beyond the transport's retry budget.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Raw response body attached to API-level failures, if any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } | Self::MalformedResponse { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CorezoidError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, CorezoidError>;
