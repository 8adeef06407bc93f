//! Response correlation
//!
//! [`ResponseView`] wraps one decoded response and looks results up by the
//! `ref` the caller put on each operation. The engine is assumed, not
//! guaranteed, to answer in request order, so lookups never use position.

use std::fmt;

use corezoid_domain::{CorezoidError, ProcStatus, ResponseEnvelope, Result};
use serde_json::{Map, Value};

/// One per-operation result as returned by the engine.
pub type ResultRecord = Map<String, Value>;

/// Decoded engine response with correlation helpers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseView {
    raw: Value,
    envelope: ResponseEnvelope,
}

impl ResponseView {
    /// Build a view from the decoded JSON body.
    ///
    /// # Errors
    /// Returns `CorezoidError::MalformedResponse` if the document is not an
    /// envelope object.
    pub fn from_value(raw: Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(CorezoidError::MalformedResponse {
                reason: "response is not a JSON object".into(),
                body: raw.to_string(),
            });
        }
        let envelope: ResponseEnvelope = serde_json::from_value(raw.clone()).map_err(|err| {
            CorezoidError::MalformedResponse {
                reason: format!("unexpected response shape: {err}"),
                body: raw.to_string(),
            }
        })?;
        Ok(Self { raw, envelope })
    }

    /// Decode a raw response body.
    ///
    /// # Errors
    /// Returns `CorezoidError::MalformedResponse` carrying the body when it
    /// is not JSON or not an envelope object.
    pub fn parse(body: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(body).map_err(|err| CorezoidError::MalformedResponse {
            reason: format!("invalid JSON response: {err}"),
            body: body.to_string(),
        })?;
        Self::from_value(raw)
    }

    /// True iff `request_proc == "ok"`.
    pub fn is_success(&self) -> bool {
        self.envelope.is_ok()
    }

    /// The engine's error message; `None` on success.
    pub fn error_message(&self) -> Option<&str> {
        if self.is_success() {
            return None;
        }
        self.envelope.error_message.as_deref()
    }

    /// Every per-operation result, in the order received.
    pub fn results(&self) -> &[ResultRecord] {
        &self.envelope.ops
    }

    /// First result whose `ref` equals `reference`.
    ///
    /// Duplicate references are a caller error; the first match wins. A
    /// result without a `ref` never matches.
    pub fn result_for(&self, reference: &str) -> Option<&ResultRecord> {
        self.envelope
            .ops
            .iter()
            .find(|record| record.get("ref").and_then(Value::as_str) == Some(reference))
    }

    /// `proc` of the result correlated with `reference`.
    pub fn status_for(&self, reference: &str) -> Option<ProcStatus> {
        self.result_for(reference)?.get("proc").and_then(Value::as_str).map(ProcStatus::from)
    }

    /// Engine-assigned `obj_id` of the result correlated with `reference`.
    pub fn object_id_for(&self, reference: &str) -> Option<&str> {
        self.result_for(reference)?.get("obj_id").and_then(Value::as_str)
    }

    /// The typed envelope behind this view.
    pub fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }

    /// The decoded document, including fields the SDK does not interpret.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl fmt::Display for ResponseView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self.raw) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}", self.raw),
        }
    }
}
