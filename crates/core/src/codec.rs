//! Operation builders
//!
//! Pure constructors for every operation and acknowledgement shape the SDK
//! sends. `conv_id` accepts any integer or string and is always rendered as
//! a string.

use corezoid_domain::{
    ConvId, Operation, OperationResult, SchemaUpload, TaskData, TaskIdentity, TaskOperation,
};

/// Create a task in `conv_id`, correlated by `reference`.
pub fn build_create(conv_id: impl Into<ConvId>, reference: impl Into<String>, data: TaskData) -> Operation {
    TaskOperation::create(conv_id, reference, data).into()
}

/// Modify the task created under `reference`.
pub fn build_modify_by_ref(
    conv_id: impl Into<ConvId>,
    reference: impl Into<String>,
    data: TaskData,
) -> Operation {
    build_modify(conv_id, TaskIdentity::Ref(reference.into()), data)
}

/// Modify the task with engine id `obj_id`.
pub fn build_modify_by_id(
    conv_id: impl Into<ConvId>,
    obj_id: impl Into<String>,
    data: TaskData,
) -> Operation {
    build_modify(conv_id, TaskIdentity::ObjId(obj_id.into()), data)
}

/// Modify a task addressed by either identity.
pub fn build_modify(conv_id: impl Into<ConvId>, identity: TaskIdentity, data: TaskData) -> Operation {
    TaskOperation::modify(conv_id, identity, data).into()
}

/// Fetch the task created under `reference`.
pub fn build_get_by_ref(conv_id: impl Into<ConvId>, reference: impl Into<String>) -> Operation {
    build_get(conv_id, TaskIdentity::Ref(reference.into()))
}

/// Fetch the task with engine id `obj_id`.
pub fn build_get_by_id(conv_id: impl Into<ConvId>, obj_id: impl Into<String>) -> Operation {
    build_get(conv_id, TaskIdentity::ObjId(obj_id.into()))
}

/// Get operations never carry a `data` field.
pub fn build_get(conv_id: impl Into<ConvId>, identity: TaskIdentity) -> Operation {
    TaskOperation::get(conv_id, identity).into()
}

/// `folder_id` follows the same string rendering as `conv_id`.
pub fn build_schema_upload(
    folder_id: impl Into<ConvId>,
    scheme: impl Into<String>,
    async_mode: bool,
) -> Operation {
    let folder_id: ConvId = folder_id.into();
    SchemaUpload::new(folder_id.as_str(), scheme, async_mode).into()
}

/// Successful acknowledgement of a task operation.
pub fn build_ack(
    conv_id: impl Into<ConvId>,
    reference: impl Into<String>,
    data: Option<TaskData>,
) -> OperationResult {
    OperationResult::ok(conv_id, reference, data)
}

/// Failed acknowledgement carrying the reason and an optional code.
pub fn build_error(
    conv_id: impl Into<ConvId>,
    reference: impl Into<String>,
    message: impl Into<String>,
    code: Option<String>,
) -> OperationResult {
    OperationResult::error(conv_id, reference, message, code)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn payload(value: Value) -> TaskData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn create_echoes_reference_and_data() {
        let data = payload(json!({"key": "value", "n": 3}));
        let op = build_create(1234_u64, "test-ref", data.clone());
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({
                "type": "create",
                "conv_id": "1234",
                "obj": "task",
                "ref": "test-ref",
                "data": {"key": "value", "n": 3}
            })
        );
        assert_eq!(op.reference(), Some("test-ref"));
        assert_eq!(op.data(), Some(&data));
    }

    #[test]
    fn modify_addresses_by_ref_or_id() {
        let by_ref = serde_json::to_value(build_modify_by_ref("1", "r", payload(json!({"a": 1})))).unwrap();
        assert_eq!(by_ref["type"], "modify");
        assert_eq!(by_ref["ref"], "r");
        assert!(by_ref.get("obj_id").is_none());

        let by_id = serde_json::to_value(build_modify_by_id("1", "o-9", payload(json!({"a": 1})))).unwrap();
        assert_eq!(by_id["obj_id"], "o-9");
        assert!(by_id.get("ref").is_none());
    }

    #[test]
    fn get_has_no_data_field() {
        for op in [build_get_by_ref(5_i32, "r"), build_get_by_id("5", "o")] {
            let rendered = serde_json::to_value(&op).unwrap();
            assert_eq!(rendered["type"], "get");
            assert_eq!(rendered["conv_id"], "5");
            assert!(rendered.get("data").is_none());
        }
    }

    #[test]
    fn schema_upload_stringifies_folder_id() {
        let rendered = serde_json::to_value(build_schema_upload(77_u64, "[{}]", false)).unwrap();
        assert_eq!(
            rendered,
            json!({"type": "create", "obj": "obj_scheme", "folder_id": "77", "scheme": "[{}]", "async": "false"})
        );
    }

    #[test]
    fn ack_and_error_omit_absent_optionals() {
        let ack = serde_json::to_value(build_ack("1", "r", None)).unwrap();
        assert!(ack.get("data").is_none());

        let with_data = serde_json::to_value(build_ack("1", "r", Some(payload(json!({"x": 1}))))).unwrap();
        assert_eq!(with_data["data"], json!({"x": 1}));

        let error = serde_json::to_value(build_error("1", "r", "failed", None)).unwrap();
        assert_eq!(error["proc"], "error");
        assert_eq!(error["error_message"], "failed");
        assert!(error.get("error_code").is_none());
    }
}
