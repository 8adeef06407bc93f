//! Request-side operations
//!
//! An [`Operation`] is one entry of the `ops` array sent to the engine.
//! Serialization is written out by hand so that key order is fixed and
//! optional fields are either present with a value or entirely absent;
//! the engine treats a missing field and a `null` field differently.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CorezoidError;

/// Opaque task payload. Always a JSON object.
pub type TaskData = Map<String, Value>;

/// Conveyor identifier, always rendered as a string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConvId(String);

impl ConvId {
    /// Identifier as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConvId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConvId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for ConvId {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

macro_rules! conv_id_from_integer {
    ($($ty:ty),+) => {
        $(impl From<$ty> for ConvId {
            fn from(value: $ty) -> Self {
                Self(value.to_string())
            }
        })+
    };
}

conv_id_from_integer!(u32, u64, i32, i64, usize);

impl Serialize for ConvId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ConvId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(Self(text)),
            Value::Number(number) => Ok(Self(number.to_string())),
            other => Err(de::Error::custom(format!("conv_id must be a string or number, got {other}"))),
        }
    }
}

/// Value of the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// `create`
    Create,
    /// `modify`
    Modify,
    /// `get`
    Get,
}

impl OperationKind {
    /// Wire name of the operation type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Get => "get",
        }
    }
}

/// Value of the `obj` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// `task`
    #[serde(rename = "task")]
    Task,
    /// `obj_scheme`
    #[serde(rename = "obj_scheme")]
    ObjScheme,
}

impl ObjectKind {
    /// Wire name of the object kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::ObjScheme => "obj_scheme",
        }
    }
}

/// How a task operation addresses its task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskIdentity {
    /// Caller-chosen or generated correlation reference (`ref`)
    Ref(String),
    /// Engine-assigned task id (`obj_id`)
    ObjId(String),
}

/// A create, modify or get operation on a task.
///
/// Constructors uphold the shape rules: create always carries a reference
/// and a payload, get never carries a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOperation {
    kind: OperationKind,
    conv_id: ConvId,
    identity: TaskIdentity,
    data: Option<TaskData>,
}

impl TaskOperation {
    /// Create addressed by `reference`, always with a payload.
    pub fn create(conv_id: impl Into<ConvId>, reference: impl Into<String>, data: TaskData) -> Self {
        Self {
            kind: OperationKind::Create,
            conv_id: conv_id.into(),
            identity: TaskIdentity::Ref(reference.into()),
            data: Some(data),
        }
    }

    /// Modify carrying a replacement payload.
    pub fn modify(conv_id: impl Into<ConvId>, identity: TaskIdentity, data: TaskData) -> Self {
        Self { kind: OperationKind::Modify, conv_id: conv_id.into(), identity, data: Some(data) }
    }

    /// Get without a payload.
    pub fn get(conv_id: impl Into<ConvId>, identity: TaskIdentity) -> Self {
        Self { kind: OperationKind::Get, conv_id: conv_id.into(), identity, data: None }
    }

    /// Operation type.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Target conveyor.
    pub fn conv_id(&self) -> &ConvId {
        &self.conv_id
    }

    /// How the task is addressed.
    pub fn identity(&self) -> &TaskIdentity {
        &self.identity
    }

    /// Payload, absent for gets.
    pub fn data(&self) -> Option<&TaskData> {
        self.data.as_ref()
    }
}

/// Upload of a process schema into a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaUpload {
    folder_id: String,
    scheme: String,
    async_mode: bool,
}

impl SchemaUpload {
    /// Upload `scheme` into `folder_id`.
    pub fn new(folder_id: impl Into<String>, scheme: impl Into<String>, async_mode: bool) -> Self {
        Self { folder_id: folder_id.into(), scheme: scheme.into(), async_mode }
    }

    /// Destination folder.
    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// Schema document as a JSON string
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Whether the engine imports the schema asynchronously.
    pub fn async_mode(&self) -> bool {
        self.async_mode
    }
}

/// One entry of a request envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Task operation on a conveyor.
    Task(TaskOperation),
    /// Schema upload.
    Schema(SchemaUpload),
}

impl Operation {
    /// Operation type; schema uploads are creates.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Task(task) => task.kind,
            Self::Schema(_) => OperationKind::Create,
        }
    }

    /// Value of the `obj` field.
    pub fn object(&self) -> ObjectKind {
        match self {
            Self::Task(_) => ObjectKind::Task,
            Self::Schema(_) => ObjectKind::ObjScheme,
        }
    }

    /// Correlation reference, when the operation addresses its task by `ref`.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Task(TaskOperation { identity: TaskIdentity::Ref(reference), .. }) => {
                Some(reference)
            }
            _ => None,
        }
    }

    /// Engine task id, when the operation addresses its task by `obj_id`.
    pub fn object_id(&self) -> Option<&str> {
        match self {
            Self::Task(TaskOperation { identity: TaskIdentity::ObjId(id), .. }) => Some(id),
            _ => None,
        }
    }

    /// Target conveyor; `None` for schema uploads.
    pub fn conv_id(&self) -> Option<&ConvId> {
        match self {
            Self::Task(task) => Some(&task.conv_id),
            Self::Schema(_) => None,
        }
    }

    /// Task payload, if any.
    pub fn data(&self) -> Option<&TaskData> {
        match self {
            Self::Task(task) => task.data.as_ref(),
            Self::Schema(_) => None,
        }
    }
}

impl From<TaskOperation> for Operation {
    fn from(value: TaskOperation) -> Self {
        Self::Task(value)
    }
}

impl From<SchemaUpload> for Operation {
    fn from(value: SchemaUpload) -> Self {
        Self::Schema(value)
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Task(task) => {
                let len = if task.data.is_some() { 5 } else { 4 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("type", task.kind.as_str())?;
                map.serialize_entry("conv_id", task.conv_id.as_str())?;
                map.serialize_entry("obj", ObjectKind::Task.as_str())?;
                match &task.identity {
                    TaskIdentity::Ref(reference) => map.serialize_entry("ref", reference)?,
                    TaskIdentity::ObjId(id) => map.serialize_entry("obj_id", id)?,
                }
                if let Some(data) = &task.data {
                    map.serialize_entry("data", data)?;
                }
                map.end()
            }
            Self::Schema(upload) => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("type", OperationKind::Create.as_str())?;
                map.serialize_entry("obj", ObjectKind::ObjScheme.as_str())?;
                map.serialize_entry("folder_id", &upload.folder_id)?;
                map.serialize_entry("scheme", &upload.scheme)?;
                map.serialize_entry("async", if upload.async_mode { "true" } else { "false" })?;
                map.end()
            }
        }
    }
}

/// Wire shape accepted when decoding; validated into [`Operation`].
#[derive(Deserialize)]
struct RawOperation {
    #[serde(rename = "type")]
    kind: OperationKind,
    obj: ObjectKind,
    conv_id: Option<ConvId>,
    #[serde(rename = "ref")]
    reference: Option<String>,
    obj_id: Option<String>,
    #[serde(default, deserialize_with = "present")]
    data: Option<Value>,
    folder_id: Option<ConvId>,
    scheme: Option<String>,
    #[serde(rename = "async")]
    async_mode: Option<String>,
}

/// Keeps an explicit `null` distinguishable from an absent field.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

fn object_payload(data: Option<Value>, kind: OperationKind) -> Result<TaskData, CorezoidError> {
    match data {
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(CorezoidError::Validation(format!(
            "{} operation data must be a JSON object, got {other}",
            kind.as_str()
        ))),
        None => Err(CorezoidError::Validation(format!(
            "{} operation requires a data field",
            kind.as_str()
        ))),
    }
}

impl TryFrom<RawOperation> for Operation {
    type Error = CorezoidError;

    fn try_from(raw: RawOperation) -> Result<Self, Self::Error> {
        if raw.obj == ObjectKind::ObjScheme {
            if raw.kind != OperationKind::Create {
                return Err(CorezoidError::Validation(
                    "obj_scheme only supports the create operation".into(),
                ));
            }
            let folder_id = raw
                .folder_id
                .ok_or_else(|| CorezoidError::Validation("schema upload requires folder_id".into()))?;
            let scheme = raw
                .scheme
                .ok_or_else(|| CorezoidError::Validation("schema upload requires scheme".into()))?;
            let async_mode = match raw.async_mode.as_deref() {
                None | Some("false") => false,
                Some("true") => true,
                Some(other) => {
                    return Err(CorezoidError::Validation(format!(
                        "async must be \"true\" or \"false\", got {other:?}"
                    )))
                }
            };
            return Ok(Self::Schema(SchemaUpload::new(folder_id.0, scheme, async_mode)));
        }

        let conv_id = raw
            .conv_id
            .ok_or_else(|| CorezoidError::Validation("task operation requires conv_id".into()))?;

        let identity = match (raw.reference, raw.obj_id) {
            (Some(reference), None) => TaskIdentity::Ref(reference),
            (None, Some(id)) => TaskIdentity::ObjId(id),
            (Some(_), Some(_)) => {
                return Err(CorezoidError::Validation(
                    "task operation must not carry both ref and obj_id".into(),
                ))
            }
            (None, None) => {
                return Err(CorezoidError::Validation(
                    "task operation requires either ref or obj_id".into(),
                ))
            }
        };

        let task = match raw.kind {
            OperationKind::Create => {
                let TaskIdentity::Ref(reference) = identity else {
                    return Err(CorezoidError::Validation(
                        "create operation must be addressed by ref".into(),
                    ));
                };
                TaskOperation::create(conv_id, reference, object_payload(raw.data, raw.kind)?)
            }
            OperationKind::Modify => {
                TaskOperation::modify(conv_id, identity, object_payload(raw.data, raw.kind)?)
            }
            OperationKind::Get => {
                if raw.data.is_some() {
                    return Err(CorezoidError::Validation(
                        "get operation must not carry data".into(),
                    ));
                }
                TaskOperation::get(conv_id, identity)
            }
        };

        Ok(Self::Task(task))
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawOperation::deserialize(deserializer)?;
        Self::try_from(raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(value: Value) -> TaskData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn conv_id_renders_integers_as_strings() {
        assert_eq!(ConvId::from(42_u64).as_str(), "42");
        assert_eq!(ConvId::from(-7_i64).as_str(), "-7");
        assert_eq!(ConvId::from("1234").as_str(), "1234");
    }

    #[test]
    fn create_serializes_keys_in_wire_order() {
        let op = Operation::from(TaskOperation::create(1_u32, "r1", payload(json!({"k": "v"}))));
        assert_eq!(
            serde_json::to_string(&op).unwrap(),
            r#"{"type":"create","conv_id":"1","obj":"task","ref":"r1","data":{"k":"v"}}"#
        );
    }

    #[test]
    fn get_omits_data_entirely() {
        let op = Operation::from(TaskOperation::get("9", TaskIdentity::ObjId("abc".into())));
        let rendered = serde_json::to_value(&op).unwrap();
        assert_eq!(rendered, json!({"type": "get", "conv_id": "9", "obj": "task", "obj_id": "abc"}));
        assert!(rendered.get("data").is_none());
        assert!(rendered.get("ref").is_none());
    }

    #[test]
    fn schema_upload_renders_async_as_string() {
        let op = Operation::from(SchemaUpload::new("55", "[]", true));
        assert_eq!(
            serde_json::to_string(&op).unwrap(),
            r#"{"type":"create","obj":"obj_scheme","folder_id":"55","scheme":"[]","async":"true"}"#
        );
        assert_eq!(op.object(), ObjectKind::ObjScheme);
        assert!(op.reference().is_none());
    }

    #[test]
    fn decodes_what_it_encodes() {
        let ops = vec![
            Operation::from(TaskOperation::create("1", "r1", payload(json!({"a": 1})))),
            Operation::from(TaskOperation::modify(
                "1",
                TaskIdentity::ObjId("o1".into()),
                payload(json!({"b": true})),
            )),
            Operation::from(TaskOperation::get("1", TaskIdentity::Ref("r1".into()))),
            Operation::from(SchemaUpload::new("7", "{}", false)),
        ];
        let text = serde_json::to_string(&ops).unwrap();
        let decoded: Vec<Operation> = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, ops);
    }

    #[test]
    fn decoding_accepts_numeric_conv_id() {
        let op: Operation =
            serde_json::from_value(json!({"type": "get", "conv_id": 12, "obj": "task", "ref": "r"}))
                .unwrap();
        assert_eq!(op.conv_id().map(ConvId::as_str), Some("12"));
    }

    #[test]
    fn decoding_rejects_ambiguous_identity() {
        let both = json!({"type": "get", "conv_id": "1", "obj": "task", "ref": "r", "obj_id": "o"});
        assert!(serde_json::from_value::<Operation>(both).is_err());

        let neither = json!({"type": "get", "conv_id": "1", "obj": "task"});
        assert!(serde_json::from_value::<Operation>(neither).is_err());
    }

    #[test]
    fn decoding_distinguishes_null_data_from_absent_data() {
        let null_data = json!({"type": "get", "conv_id": "1", "obj": "task", "ref": "r", "data": null});
        assert!(serde_json::from_value::<Operation>(null_data).is_err());

        let create_null =
            json!({"type": "create", "conv_id": "1", "obj": "task", "ref": "r", "data": null});
        assert!(serde_json::from_value::<Operation>(create_null).is_err());
    }

    #[test]
    fn decoding_rejects_create_by_object_id() {
        let value = json!({"type": "create", "conv_id": "1", "obj": "task", "obj_id": "o", "data": {}});
        assert!(serde_json::from_value::<Operation>(value).is_err());
    }
}
