//! End-to-end client behaviour against a local engine double.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use corezoid::prelude::*;
use corezoid::{signature, ProcStatus, ReqwestTransport};
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, header, method};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

struct Engine {
    server: MockServer,
    runtime: Runtime,
}

impl Engine {
    fn start() -> Self {
        let runtime = Runtime::new().expect("runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn requests(&self) -> Vec<Request> {
        self.runtime.block_on(self.server.received_requests()).unwrap_or_default()
    }

    fn client(&self) -> CorezoidClient {
        let config = ClientConfig::new("L", "S")
            .with_api_url(format!("{}/api/2/json", self.server.uri()))
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0);
        client_without_proxy(config)
    }
}

fn client_without_proxy(config: ClientConfig) -> CorezoidClient {
    let http = ReqwestTransport::builder()
        .timeout(config.timeout)
        .max_retries(config.max_retries)
        .base_backoff(Duration::from_millis(5))
        .no_proxy()
        .build()
        .expect("http transport");
    CorezoidClient::builder(config).http_transport(Arc::new(http)).build().expect("client")
}

fn task_data(value: Value) -> TaskData {
    value.as_object().cloned().expect("object")
}

#[test]
fn create_task_round_trip() {
    let engine = Engine::start();
    engine.mount(
        Mock::given(method("POST"))
            .and(header("X-API-Login", "L"))
            .and(body_json(json!({
                "ops": [{"type": "create", "conv_id": "42", "obj": "task", "ref": "r1", "data": {"x": 1}}]
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"request_proc":"ok","ops":[{"ref":"r1","proc":"ok"}]}"#),
            )
            .expect(1),
    );

    let response = engine.client().create_task("42", task_data(json!({"x": 1})), Some("r1".into())).unwrap();

    assert!(response.is_success());
    assert_eq!(response.error_message(), None);
    assert_eq!(response.result_for("r1"), json!({"ref": "r1", "proc": "ok"}).as_object());
    assert_eq!(response.status_for("r1"), Some(ProcStatus::Ok));

    let request = &engine.requests()[0];
    let body = String::from_utf8(request.body.clone()).unwrap();
    let timestamp = request.headers.get("X-API-Timestamp").and_then(|v| v.to_str().ok()).unwrap();
    let sig = request.headers.get("X-API-Signature").and_then(|v| v.to_str().ok()).unwrap();
    assert_eq!(sig.len(), 64);
    assert!(signature::verify(sig, "S", timestamp, &body));
}

#[test]
fn batch_results_are_correlated_by_reference_not_position() {
    let engine = Engine::start();
    engine.mount(Mock::given(method("POST")).respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "request_proc": "ok",
        "ops": [
            {"ref": "second", "proc": "ok", "obj_id": "o2"},
            {"ref": "first", "proc": "error", "description": "bad data"}
        ]
    }))));

    let client = engine.client();
    let mut batch = client.create_batch_with_capacity(2);
    let first = batch.add_create("1", task_data(json!({"n": 1})), Some("first".into())).unwrap();
    let second = batch.add_create("1", task_data(json!({"n": 2})), None).unwrap();
    assert!(batch.is_full());
    assert!(matches!(
        batch.add_get_by_ref("1", "third"),
        Err(CorezoidError::CapacityExceeded { max_batch_size: 2 })
    ));

    let response = client.send_batch(&batch).unwrap();

    assert_eq!(response.status_for(&first), Some(ProcStatus::Error));
    // The generated reference is not the one the engine answered with.
    assert!(response.result_for(&second).is_none());
    assert_eq!(response.object_id_for("second"), Some("o2"));

    let sent: Value = serde_json::from_slice(&engine.requests()[0].body).unwrap();
    assert_eq!(sent["ops"][1]["ref"], second.as_str());
}

#[test]
fn engine_rejection_is_a_normal_response() {
    let engine = Engine::start();
    engine.mount(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"request_proc":"error","error_message":"Wrong api signature"}"#,
            ))
            .expect(1),
    );

    let response = engine.client().get_task("42", "r1").unwrap();

    assert!(!response.is_success());
    assert_eq!(response.error_message(), Some("Wrong api signature"));
    assert!(response.results().is_empty());
}

#[test]
fn non_success_status_is_an_api_error() {
    let engine = Engine::start();
    engine.mount(
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"request_proc":"error"}"#))
            .expect(1),
    );

    let err = engine.client().get_task_by_id("42", "abc").unwrap_err();

    assert!(matches!(err, CorezoidError::Api { status: 401, .. }));
    assert_eq!(err.response_body(), Some(r#"{"request_proc":"error"}"#));
}

#[test]
fn empty_calls_never_reach_the_engine() {
    let engine = Engine::start();
    let client = engine.client();

    assert!(matches!(client.send(&[]), Err(CorezoidError::Validation(_))));
    assert!(matches!(client.send_batch(&client.create_batch()), Err(CorezoidError::Validation(_))));
    assert!(engine.requests().is_empty());
}

#[test]
fn unreachable_engine_is_a_connection_error() {
    // Bind then drop so the port is free and nothing listens on it.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new("L", "S")
        .with_api_url(format!("http://{addr}/api/2/json"))
        .with_timeout(Duration::from_secs(2))
        .with_max_retries(1);
    let client = client_without_proxy(config);

    let err = client.get_task("1", "r").unwrap_err();
    assert!(matches!(err, CorezoidError::Connection(_)), "got {err:?}");
    assert!(err.is_retryable());
}
