//! SDK constants
//!
//! Wire names and built-in defaults shared by every crate in the workspace.

// Configuration defaults
/// Production JSON API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.corezoid.com/api/2/json";
/// HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Connection-level retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Operations accepted by a batch unless configured otherwise.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

// Environment variables
/// API login.
pub const ENV_API_LOGIN: &str = "COREZOID_API_LOGIN";
/// API secret.
pub const ENV_API_SECRET: &str = "COREZOID_API_SECRET";
/// Endpoint URL.
pub const ENV_API_URL: &str = "COREZOID_API_URL";
/// Timeout in whole seconds.
pub const ENV_TIMEOUT: &str = "COREZOID_TIMEOUT";
/// Retry count.
pub const ENV_MAX_RETRIES: &str = "COREZOID_MAX_RETRIES";

// Auth headers
/// Content type header.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// Login header.
pub const HEADER_API_LOGIN: &str = "X-API-Login";
/// Hex HMAC-SHA256 signature header.
pub const HEADER_API_SIGNATURE: &str = "X-API-Signature";
/// Signing timestamp header.
pub const HEADER_API_TIMESTAMP: &str = "X-API-Timestamp";
/// Body content type.
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Envelope values
/// `request_proc` value of an accepted request.
pub const REQUEST_PROC_OK: &str = "ok";
/// Leading segment of generated references.
pub const REFERENCE_PREFIX: &str = "task";
/// Random hex characters ending a generated reference.
pub const REFERENCE_SUFFIX_LEN: usize = 8;
