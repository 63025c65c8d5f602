//! Error responses produced outside the endpoint.
//!
//! # Responsibilities
//! - Give middleware rejections (body limit, timeout) the same
//!   `{"error": ...}` JSON shape as handler errors
//!
//! # Design Decisions
//! - Responses that are already JSON pass through untouched
//! - Headers of the rewritten response are not carried over

use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::inference::event::CONTENT_TYPE_JSON;
use crate::inference::ResponseEnvelope;

/// Rewrite non-JSON 4xx/5xx responses into an error envelope.
pub async fn json_errors(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    tracing::debug!(status = %status, "Rewriting middleware error response");
    ResponseEnvelope::error(status.as_u16(), error_message(status)).into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(CONTENT_TYPE_JSON))
}

fn error_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        _ => status.canonical_reason().unwrap_or("Request failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(handler_status: StatusCode, content_type: Option<&'static str>) -> Router {
        Router::new()
            .route(
                "/",
                get(move || async move {
                    let mut response = Response::new(Body::from("upstream text"));
                    *response.status_mut() = handler_status;
                    if let Some(ct) = content_type {
                        response
                            .headers_mut()
                            .insert(CONTENT_TYPE, ct.parse().unwrap());
                    }
                    response
                }),
            )
            .layer(axum::middleware::from_fn(json_errors))
    }

    async fn call(router: Router) -> (StatusCode, Option<String>, Vec<u8>) {
        let request = axum::http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_timeout_gets_json_body() {
        let (status, content_type, body) = call(app(StatusCode::REQUEST_TIMEOUT, None)).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"error": "Request timed out"}));
    }

    #[tokio::test]
    async fn test_plain_text_error_rewritten() {
        let (status, content_type, body) =
            call(app(StatusCode::PAYLOAD_TOO_LARGE, Some("text/plain; charset=utf-8"))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"error": "Request body too large"}));
    }

    #[tokio::test]
    async fn test_json_and_success_pass_through() {
        let (_, _, body) = call(app(StatusCode::BAD_REQUEST, Some("application/json"))).await;
        assert_eq!(body, b"upstream text");

        let (status, _, body) = call(app(StatusCode::OK, Some("text/plain"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"upstream text");
    }
}
