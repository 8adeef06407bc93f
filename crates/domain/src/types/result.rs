//! Response-side operation acknowledgements

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::operation::{ConvId, ObjectKind, TaskData};

/// Per-operation outcome discriminator (`proc`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProcStatus {
    /// `ok`
    Ok,
    /// `error`
    Error,
    /// Any other value the engine reports (e.g. intermediate node states)
    Other(String),
}

impl ProcStatus {
    /// Wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::Other(value) => value,
        }
    }

    /// True for `ok`.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<&str> for ProcStatus {
    fn from(value: &str) -> Self {
        match value {
            "ok" => Self::Ok,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ProcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProcStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProcStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value.as_str()))
    }
}

/// Acknowledgement of one task operation, as the engine (or a callback
/// handler answering the engine) reports it.
///
/// `data`, `error_message` and `error_code` are absent from the JSON when
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Object kind acknowledged.
    pub obj: ObjectKind,
    /// Outcome.
    pub proc: ProcStatus,
    /// Conveyor the task belongs to.
    pub conv_id: ConvId,
    /// Reference of the acknowledged task.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Task payload echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TaskData>,
    /// Reason for a failed operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Machine-readable failure code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl OperationResult {
    /// Acknowledge success.
    pub fn ok(conv_id: impl Into<ConvId>, reference: impl Into<String>, data: Option<TaskData>) -> Self {
        Self {
            obj: ObjectKind::Task,
            proc: ProcStatus::Ok,
            conv_id: conv_id.into(),
            reference: reference.into(),
            data,
            error_message: None,
            error_code: None,
        }
    }

    /// Acknowledge failure.
    pub fn error(
        conv_id: impl Into<ConvId>,
        reference: impl Into<String>,
        message: impl Into<String>,
        code: Option<String>,
    ) -> Self {
        Self {
            obj: ObjectKind::Task,
            proc: ProcStatus::Error,
            conv_id: conv_id.into(),
            reference: reference.into(),
            data: None,
            error_message: Some(message.into()),
            error_code: code,
        }
    }
}
