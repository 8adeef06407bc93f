//! Wire types: operations, acknowledgements, envelopes and HTTP exchange data

pub mod envelope;
pub mod http;
pub mod operation;
pub mod result;

pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use http::{AuthHeaders, HttpRequest, HttpResponse};
pub use operation::{
    ConvId, ObjectKind, Operation, OperationKind, SchemaUpload, TaskData, TaskIdentity,
    TaskOperation,
};
pub use result::{OperationResult, ProcStatus};
