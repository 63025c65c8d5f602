//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the invocation handler
//! - Wire up middleware (tracing, limits, timeout, request ID, JSON errors)
//! - Bind server to listener and shut down gracefully
//!
//! Routing is not done by Axum: every request reaches the fallback handler
//! and is dispatched by [`Endpoint`], so the HTTP surface and the `invoke`
//! command behave identically.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::EndpointConfig;
use crate::http::middleware::json_errors;
use crate::http::request;
use crate::inference::Endpoint;

/// HTTP server for the churn endpoint.
pub struct HttpServer {
    router: Router,
    config: EndpointConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EndpointConfig, endpoint: Endpoint) -> Self {
        let router = Self::build_router(&config, endpoint);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EndpointConfig, endpoint: Endpoint) -> Router {
        Router::new()
            .fallback(invoke_handler)
            .with_state(endpoint)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(json_errors))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            max_body_bytes = self.config.limits.max_body_bytes,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Converts the request to an invocation event and hands it to the endpoint.
async fn invoke_handler(
    State(endpoint): State<Endpoint>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = request::request_id(&headers);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
        "Handling request"
    );

    let response = match request::decode_body(&body) {
        Ok(text) => endpoint.handle(&request::to_event(&method, &uri, text), &request_id),
        Err(err) => {
            let event = request::to_event(&method, &uri, None);
            let raw = String::from_utf8_lossy(&body).into_owned();
            endpoint.handle_undecodable(&event, &request_id, raw, &err)
        }
    };
    response.into_response()
}
