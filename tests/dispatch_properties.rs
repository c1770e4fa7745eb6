//! Behavioural properties of resolution and dispatch, checked through the
//! public API only.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nsrpc_json_rpc_server::prelude::*;
use nsrpc_json_rpc_server::resolve;
use serde_json::json;

fn sum(params: RawParams) -> HandlerResult {
    let input: Vec<i64> = params.parse()?;
    Ok(json!(input.iter().sum::<i64>()))
}

fn echo_len(params: RawParams) -> HandlerResult {
    Ok(json!(params.as_bytes().len()))
}

fn failing(_: RawParams) -> HandlerResult {
    Err(RpcError::internal("backend unavailable").with_cause(RpcError::missing_param("shard")))
}

fn sample_tree() -> Namespace {
    Namespace::new()
        .with_namespace(
            "ns1",
            Namespace::new()
                .with_namespace("ns2", Namespace::new().with_handler("sum", sum))
                .with_handler("echo_len", echo_len),
        )
        .with_handler("failing", failing)
        .with_handler("dual", echo_len)
        .with_namespace("dual", Namespace::new().with_handler("sum", sum))
}

const PATHS: &[&[&str]] = &[
    &["ns1", "ns2", "sum"],
    &["ns1", "echo_len"],
    &["ns1", "missing_ns", "x"],
    &["ns1", "ns2"],
    &["failing"],
    &["dual"],
    &["dual", "sum"],
    &["nope"],
    &[],
];

#[test]
fn resolution_is_deterministic() {
    let root = sample_tree();

    for &path in PATHS {
        let first = resolve(&root, path);
        let second = resolve(&root, path);

        match (first, second) {
            (Ok(a), Ok(b)) => assert!(Arc::ptr_eq(a, b), "{:?}", path),
            (Err(a), Err(b)) => {
                assert_eq!(a.code(), b.code(), "{:?}", path);
                assert_eq!(a.message(), b.message(), "{:?}", path);
            }
            _ => panic!("resolution of {:?} changed outcome", path),
        }
    }
}

#[test]
fn unknown_namespace_takes_precedence() {
    let root = sample_tree();

    let err = resolve(&root, &["ns1", "missing_ns", "x"]).unwrap_err();
    assert!(matches!(err, RpcError::NamespaceNotFound { ref name, .. } if name == "missing_ns"));
    assert_eq!(err.code(), METHOD_NOT_FOUND);
}

#[test]
fn same_name_namespace_and_handler_coexist() {
    let root = sample_tree();

    // Terminal segment resolves against handlers only.
    assert!(resolve(&root, &["dual"]).is_ok());
    // Earlier segments resolve against namespaces only.
    assert!(resolve(&root, &["dual", "sum"]).is_ok());
    // A namespace is never callable.
    let err = resolve(&root, &["ns1", "ns2"]).unwrap_err();
    assert!(matches!(err, RpcError::MethodNotFound { ref name, .. } if name == "ns2"));
}

#[tokio::test]
async fn every_response_has_exactly_one_of_result_or_error() {
    let dispatcher = Dispatcher::with_root(sample_tree());
    let ids = [RequestId::from(1), RequestId::from("abc"), RequestId::Null];

    for id in ids {
        for method in ["ns1.ns2.sum", "ns1.echo_len", "ns1.missing_ns.x", "failing", "", "a..b"] {
            let request = JsonRpcRequest::new(
                id.clone(),
                method,
                RawParams::from_json("[1,2,3]").unwrap(),
            );
            let response = dispatcher.execute(request).await;

            assert_eq!(response.id(), &id, "method {:?}", method);
            let wire: serde_json::Value = serde_json::to_value(&response).unwrap();
            let has_result = wire.get("result").is_some();
            let has_error = wire.get("error").is_some();
            assert!(has_result ^ has_error, "method {:?}: {}", method, wire);
            assert_eq!(wire["jsonrpc"], "2.0");
            assert_eq!(wire["id"], serde_json::to_value(&id).unwrap());
        }
    }
}

#[tokio::test]
async fn wrapped_causes_reach_the_error_message() {
    let dispatcher = Dispatcher::with_root(sample_tree());

    let response = dispatcher
        .execute(JsonRpcRequest::new_no_params(7, "failing"))
        .await;

    let error = response.error_object().unwrap();
    assert_eq!(error.code, INTERNAL_ERROR);
    assert_eq!(
        error.message,
        "backend unavailable: parameter shard expected but not found"
    );
    assert_eq!(error.transport_status, None);
}

#[tokio::test]
async fn handler_sees_raw_params_untouched() {
    let dispatcher = Dispatcher::with_root(sample_tree());

    let response = dispatcher
        .handle_bytes(br#"{"jsonrpc":"2.0","method":"ns1.echo_len","params":[1,  2],"id":1}"#)
        .await;
    assert_eq!(response.result(), Some(&json!("[1,  2]".len())));

    let response = dispatcher
        .handle_bytes(br#"{"jsonrpc":"2.0","method":"ns1.echo_len","id":1}"#)
        .await;
    assert_eq!(response.result(), Some(&json!(0)));
}

#[tokio::test]
async fn shared_dispatcher_serves_concurrent_calls() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut dispatcher = Dispatcher::new();
    dispatcher.register_handler("count", move |_: RawParams| -> HandlerResult {
        Ok(json!(counter.fetch_add(1, Ordering::SeqCst)))
    });
    let dispatcher = Arc::new(dispatcher);

    let mut tasks = Vec::new();
    for i in 0..32i64 {
        let dispatcher = Arc::clone(&dispatcher);
        tasks.push(tokio::spawn(async move {
            dispatcher
                .execute(JsonRpcRequest::new_no_params(i, "count"))
                .await
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let response = task.await.unwrap();
        assert_eq!(response.id(), &RequestId::from(i as i64));
        assert!(!response.is_error());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 32);
}
