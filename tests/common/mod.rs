//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use churn_endpoint::config::EndpointConfig;
use churn_endpoint::http::HttpServer;
use churn_endpoint::inference::Endpoint;
use churn_endpoint::model::{LogisticModel, SharedModel};
use churn_endpoint::observability::MemorySink;
use churn_endpoint::Shutdown;

/// The model artifact shipped with the repository.
pub fn sample_model() -> SharedModel {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/churn_model.json");
    Arc::new(LogisticModel::load(&path).expect("sample model loads"))
}

/// Endpoint over `model` with an in-memory log sink.
pub fn endpoint_with(model: SharedModel) -> (Endpoint, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Endpoint::new(model, sink.clone()), sink)
}

/// Axum router over the sample model, plus its log sink.
pub fn router() -> (Router, Arc<MemorySink>) {
    let (endpoint, sink) = endpoint_with(sample_model());
    (HttpServer::new(EndpointConfig::default(), endpoint).router(), sink)
}

/// Drive one request through the router without a socket.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Build a JSON POST request.
pub fn post_json(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a GET request.
pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

/// Start a real server on an ephemeral port. Returns its address and the
/// handle used to stop it.
pub async fn start_server(config: EndpointConfig, endpoint: Endpoint) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, endpoint);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}
