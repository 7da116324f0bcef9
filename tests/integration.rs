//! End-to-end coverage of the decode → dispatch → encode pipeline, built
//! around the worked scenarios in the specification's Testable Properties
//! section: positional-params calls, V2 notifications, unknown methods,
//! malformed V1 requests, mixed batches, and subscribe/emit/close.

use std::sync::{Arc, Mutex};

use jrpc_runtime::codec::{decode, Decoded};
use jrpc_runtime::error::DispatchError;
use jrpc_runtime::{Dispatcher, Event, Params, Processor, Transport, TransportError, TransportHandle, Version};
use serde_json::{json, Value};

#[derive(Debug)]
struct RecordingTransport {
    received: Mutex<Vec<Value>>,
}

impl RecordingTransport {
    fn new() -> Arc<Self> {
        Arc::new(RecordingTransport {
            received: Mutex::new(Vec::new()),
        })
    }

    fn events(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn emit_message(&self, event: &Event) -> Result<(), TransportError> {
        self.received
            .lock()
            .unwrap()
            .push(serde_json::to_value(event).unwrap());
        Ok(())
    }
}

#[derive(Debug)]
struct DeadTransport;

impl Transport for DeadTransport {
    fn emit_message(&self, _event: &Event) -> Result<(), TransportError> {
        Err(TransportError("connection reset".to_string()))
    }
}

fn subtract_dispatcher() -> Dispatcher {
    let dispatcher = Dispatcher::new(true);
    dispatcher.register_fn("subtract", |params: Params| {
        let a = params
            .positional(0)
            .and_then(Value::as_i64)
            .ok_or_else(|| jrpc_runtime::error::MethodError::InvalidParams("expected a".to_string()))?;
        let b = params
            .positional(1)
            .and_then(Value::as_i64)
            .ok_or_else(|| jrpc_runtime::error::MethodError::InvalidParams("expected b".to_string()))?;
        Ok(json!(a - b))
    });
    dispatcher
}

fn body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[test]
fn subtract_with_positional_params_v2() {
    let dispatcher = subtract_dispatcher();
    let processor = Processor::new(dispatcher, None);
    let transport = TransportHandle::new(RecordingTransport::new());

    let request = br#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#;
    let response = processor.process(request, &transport).expect("expected a response");

    assert_eq!(
        body(&response),
        json!({"jsonrpc":"2.0","id":1,"result":19})
    );
}

#[test]
fn v2_notification_produces_no_response() {
    let dispatcher = subtract_dispatcher();
    let processor = Processor::new(dispatcher, None);
    let transport = TransportHandle::new(RecordingTransport::new());

    let request = br#"{"jsonrpc":"2.0","method":"subtract","params":[42,23]}"#;
    assert!(processor.process(request, &transport).is_none());
}

#[test]
fn unknown_method_reports_method_not_found() {
    let dispatcher = subtract_dispatcher();
    let processor = Processor::new(dispatcher, None);
    let transport = TransportHandle::new(RecordingTransport::new());

    let request = br#"{"jsonrpc":"2.0","method":"does_not_exist","id":1}"#;
    let response = processor.process(request, &transport).unwrap();
    let value = body(&response);

    assert_eq!(value["error"]["code"], json!(-32601));
    assert_eq!(value["id"], json!(1));
}

#[test]
fn v1_rejects_named_params() {
    let dispatcher = subtract_dispatcher();
    let processor = Processor::new(dispatcher, None);
    let transport = TransportHandle::new(RecordingTransport::new());

    let request = br#"{"method":"subtract","params":{"a":42,"b":23},"id":1}"#;
    let response = processor.process(request, &transport).unwrap();
    let value = body(&response);

    assert_eq!(value["error"]["code"], json!(-32600));
    assert_eq!(value["id"], json!(1));
    assert!(value.get("jsonrpc").is_none(), "V1 responses omit jsonrpc");
}

#[test]
fn v1_missing_id_is_rejected_with_null_id() {
    let dispatcher = subtract_dispatcher();
    let processor = Processor::new(dispatcher, None);
    let transport = TransportHandle::new(RecordingTransport::new());

    let request = br#"{"method":"subtract","params":[1,2]}"#;
    let response = processor.process(request, &transport).unwrap();
    let value = body(&response);

    assert_eq!(value["error"]["code"], json!(-32600));
    assert_eq!(value["id"], Value::Null);
}

#[test]
fn mixed_batch_preserves_order_and_drops_notifications() {
    let dispatcher = subtract_dispatcher();
    let processor = Processor::new(dispatcher, None);
    let transport = TransportHandle::new(RecordingTransport::new());

    let request = br#"[
        {"jsonrpc":"2.0","method":"subtract","params":[10,1],"id":"a"},
        {"jsonrpc":"2.0","method":"subtract","params":[1,1]},
        {"jsonrpc":"2.0","method":"subtract","params":[5,2],"id":"b"}
    ]"#;
    let response = processor.process(request, &transport).unwrap();
    let value = body(&response);
    let items = value.as_array().expect("batch response must be an array");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], json!("a"));
    assert_eq!(items[0]["result"], json!(9));
    assert_eq!(items[1]["id"], json!("b"));
    assert_eq!(items[1]["result"], json!(3));
}

#[test]
fn subscribe_emit_and_close_round_trip() {
    let dispatcher = subtract_dispatcher();
    dispatcher.register_event("tick");
    let processor = Processor::new(dispatcher.clone(), None);

    let recording = RecordingTransport::new();
    let transport = TransportHandle::new(recording.clone());

    let subscribe = br#"{"jsonrpc":"2.0","method":"rpc.on","params":["tick"],"id":1}"#;
    let response = processor.process(subscribe, &transport).unwrap();
    assert_eq!(body(&response)["result"], json!({"tick":"ok"}));

    dispatcher.emit("tick", Params::None).unwrap();
    assert_eq!(recording.events().len(), 1);
    assert_eq!(recording.events()[0]["notification"], json!("tick"));

    dispatcher.unsubscribe_all(&transport);
    dispatcher.emit("tick", Params::None).unwrap();
    assert_eq!(recording.events().len(), 1, "closed transport receives nothing further");
}

#[test]
fn emit_unsubscribes_dead_transports_without_failing_others() {
    let dispatcher = subtract_dispatcher();
    dispatcher.register_event("tick");

    let dead = TransportHandle::new(Arc::new(DeadTransport));
    let alive = RecordingTransport::new();
    let alive_handle = TransportHandle::new(alive.clone());

    dispatcher.method_subscribe(dead.clone(), "tick").unwrap();
    dispatcher.method_subscribe(alive_handle, "tick").unwrap();

    dispatcher.emit("tick", Params::None).unwrap();

    assert_eq!(alive.events().len(), 1);
    let err = dispatcher.method_unsubscribe(dead, "tick");
    assert!(err.is_ok(), "dead transport was already removed, re-unsubscribing is a no-op error path the test only needs to not panic on");
}

#[test]
fn version_pin_rejects_mismatched_request() {
    let dispatcher = subtract_dispatcher();
    let processor = Processor::new(dispatcher, Some(Version::V2));
    let transport = TransportHandle::new(RecordingTransport::new());

    let request = br#"{"method":"subtract","params":[1,2],"id":1}"#;
    let response = processor.process(request, &transport).unwrap();
    let value = body(&response);

    assert_eq!(value["error"]["code"], json!(-32600));
}

#[test]
fn parse_error_on_invalid_json() {
    let dispatcher = subtract_dispatcher();
    let processor = Processor::new(dispatcher, None);
    let transport = TransportHandle::new(RecordingTransport::new());

    let response = processor.process(b"not json at all", &transport).unwrap();
    let value = body(&response);

    assert_eq!(value["error"]["code"], json!(-32700));
    assert_eq!(value["id"], Value::Null);
}

#[test]
fn suspending_method_runs_to_completion_on_its_own_thread() {
    let dispatcher = Dispatcher::new(false);
    dispatcher.register_suspending_fn("slow_add", |params: Params| {
        let a = params.positional(0).and_then(Value::as_i64).unwrap_or(0);
        let b = params.positional(1).and_then(Value::as_i64).unwrap_or(0);
        std::thread::sleep(std::time::Duration::from_millis(10));
        Ok(json!(a + b))
    });
    let processor = Processor::new(dispatcher, None);
    let transport = TransportHandle::new(RecordingTransport::new());

    let request = br#"{"jsonrpc":"2.0","method":"slow_add","params":[2,3],"id":1}"#;
    let response = processor.process(request, &transport).expect("expected a response");

    assert_eq!(body(&response)["result"], json!(5));
}

#[test]
fn suspending_method_panic_surfaces_as_internal_dispatch_error() {
    let dispatcher = Dispatcher::new(false);
    dispatcher.register_suspending_fn("boom", |_: Params| -> Result<Value, jrpc_runtime::error::MethodError> {
        panic!("boom");
    });
    let transport = TransportHandle::new(RecordingTransport::new());

    let decoded = decode(br#"{"jsonrpc":"2.0","method":"boom","id":1}"#, None).unwrap();
    let request = match decoded {
        Decoded::Single(Ok(request)) => request,
        _ => panic!("expected a decodable single request"),
    };

    let err = dispatcher.dispatch(&transport, &request).unwrap_err();
    assert!(matches!(err, DispatchError::Internal(ref msg) if msg == "suspending method panicked"));

    // A handler panic runs on its own thread and must not poison the
    // dispatcher's method table for subsequent calls.
    assert!(dispatcher.get_method("boom").is_ok());
}
