//! Top-level request and response documents

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::operation::Operation;
use crate::constants::REQUEST_PROC_OK;
use crate::errors::Result;

/// `{"ops": [...]}` as posted to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope<'a> {
    /// Operations in send order.
    pub ops: Cow<'a, [Operation]>,
}

impl<'a> RequestEnvelope<'a> {
    /// Envelope over `ops`, borrowed.
    pub fn new(ops: &'a [Operation]) -> Self {
        Self { ops: Cow::Borrowed(ops) }
    }

    /// Compact JSON with no inserted whitespace and keys in construction
    /// order. The request signature is computed over exactly these bytes.
    ///
    /// # Errors
    /// Returns `CorezoidError::Serialization` if a payload cannot be encoded.
    pub fn to_canonical_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decoded response document.
///
/// Decoding any JSON object succeeds. Fields of an unexpected type read as
/// absent and `ops` entries that are not objects are skipped; per-operation
/// results otherwise stay opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Request-level outcome; `"ok"` on success.
    #[serde(default, deserialize_with = "string_or_none")]
    pub request_proc: Option<String>,
    /// Engine explanation of a failed request.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "string_or_none")]
    pub error_message: Option<String>,
    /// Per-operation results; entries that are not objects are dropped.
    #[serde(default, deserialize_with = "objects_only")]
    pub ops: Vec<Map<String, Value>>,
}

impl ResponseEnvelope {
    /// True iff `request_proc == "ok"`.
    pub fn is_ok(&self) -> bool {
        self.request_proc.as_deref() == Some(REQUEST_PROC_OK)
    }
}

fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

// `null`, a non-array or non-object entries all leave nothing to correlate.
fn objects_only<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<Map<String, Value>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::operation::TaskOperation;

    #[test]
    fn canonical_json_has_no_whitespace() {
        let data = json!({"k": "v"}).as_object().cloned().unwrap();
        let ops = vec![Operation::from(TaskOperation::create("1", "r1", data))];
        let text = RequestEnvelope::new(&ops).to_canonical_json().unwrap();
        assert_eq!(
            text,
            r#"{"ops":[{"type":"create","conv_id":"1","obj":"task","ref":"r1","data":{"k":"v"}}]}"#
        );
        assert_eq!(RequestEnvelope::new(&ops).to_canonical_json().unwrap(), text);
    }

    #[test]
    fn payload_keys_keep_insertion_order() {
        let mut data = Map::new();
        data.insert("zeta".into(), json!(1));
        data.insert("alpha".into(), json!(2));
        let ops = vec![Operation::from(TaskOperation::create("1", "r", data))];
        let text = RequestEnvelope::new(&ops).to_canonical_json().unwrap();
        assert!(text.ends_with(r#""data":{"zeta":1,"alpha":2}}]}"#));
    }

    #[test]
    fn response_tolerates_missing_and_null_ops() {
        let missing: ResponseEnvelope = serde_json::from_value(json!({"request_proc": "ok"})).unwrap();
        assert!(missing.ops.is_empty());
        assert!(missing.is_ok());

        let null: ResponseEnvelope =
            serde_json::from_value(json!({"request_proc": "error", "ops": null})).unwrap();
        assert!(null.ops.is_empty());
        assert!(!null.is_ok());
    }

    #[test]
    fn response_reads_unexpected_field_types_as_absent() {
        let envelope: ResponseEnvelope = serde_json::from_value(json!({
            "request_proc": "error",
            "error_message": {"code": 1}
        }))
        .unwrap();
        assert_eq!(envelope.request_proc.as_deref(), Some("error"));
        assert_eq!(envelope.error_message, None);

        let numeric: ResponseEnvelope = serde_json::from_value(json!({"request_proc": 1})).unwrap();
        assert!(!numeric.is_ok());
    }

    #[test]
    fn response_skips_non_object_results() {
        let envelope: ResponseEnvelope = serde_json::from_value(json!({
            "request_proc": "ok",
            "ops": [{"ref": "a", "proc": "ok"}, "oops", 3, null, {"ref": "b"}]
        }))
        .unwrap();
        let refs: Vec<_> = envelope.ops.iter().map(|op| op["ref"].clone()).collect();
        assert_eq!(refs, vec![json!("a"), json!("b")]);

        let scalar: ResponseEnvelope = serde_json::from_value(json!({"ops": "none"})).unwrap();
        assert!(scalar.ops.is_empty());
    }
}
