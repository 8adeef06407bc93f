//! Conversions from external infrastructure errors into domain errors.

use corezoid_domain::CorezoidError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CorezoidError);

impl From<InfraError> for CorezoidError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CorezoidError> for InfraError {
    fn from(value: CorezoidError) -> Self {
        InfraError(value)
    }
}

trait IntoCorezoidError {
    fn into_corezoid(self) -> CorezoidError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CorezoidError */
/* -------------------------------------------------------------------------- */

impl IntoCorezoidError for HttpError {
    fn into_corezoid(self) -> CorezoidError {
        if self.is_builder() {
            return CorezoidError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_timeout() {
            return CorezoidError::Connection(format!("HTTP request timed out: {self}"));
        }

        if self.is_connect() {
            return CorezoidError::Connection(format!("HTTP connection failure: {self}"));
        }

        if self.is_body() || self.is_decode() {
            return CorezoidError::Connection(format!("HTTP response could not be read: {self}"));
        }

        CorezoidError::Connection(format!("HTTP request failed: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_corezoid())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
