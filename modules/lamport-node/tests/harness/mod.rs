//! Shared helpers for lamport-node integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

use lamport_common::{ProcessId, ProcessSpec, Topology};
use lamport_node::ProcessContext;

pub fn spec(id: &str) -> ProcessSpec {
    Topology::reference()
        .process(&ProcessId::from(id))
        .expect("process exists in the reference topology")
        .clone()
}

pub fn context(id: &str) -> Arc<ProcessContext> {
    Arc::new(ProcessContext::new(spec(id)))
}

pub async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_as<T: DeserializeOwned>(app: &Router, path: &str) -> T {
    let (status, body) = get(app, path).await;
    assert_eq!(status, StatusCode::OK, "GET {path}");
    serde_json::from_value(body).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ---------------------------------------------------------------------------
// Live cluster
// ---------------------------------------------------------------------------

/// Bind every process of `topology` on an ephemeral loopback port, rewrite
/// the topology to match, and start all nodes.
pub async fn start_cluster(
    mut topology: Topology,
) -> (Arc<Topology>, Vec<lamport_node::NodeHandle>) {
    let ids: Vec<ProcessId> = topology.processes().iter().map(|p| p.id.clone()).collect();

    let mut listeners = Vec::new();
    for id in &ids {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let process = topology.process_mut(id).unwrap();
        process.host = "127.0.0.1".to_string();
        process.port = listener.local_addr().unwrap().port();
        listeners.push(listener);
    }
    topology.validate().unwrap();
    let topology = Arc::new(topology);

    let mut nodes = Vec::new();
    for (id, listener) in ids.iter().zip(listeners) {
        let spec = topology.require(id).unwrap().clone();
        let ctx = Arc::new(ProcessContext::new(spec));
        let messenger = Arc::new(
            lamport_node::HttpMessenger::new(topology.message_timeout()).unwrap(),
        );
        nodes.push(
            lamport_node::spawn_node(ctx, topology.clone(), messenger, listener).unwrap(),
        );
    }
    (topology, nodes)
}
