//! Request handling and transformation.
//!
//! # Responsibilities
//! - Read the request ID set by the request-id layer
//! - Convert an HTTP request into an [`InvocationEvent`]
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body forwarded as text; parsing is the predict handler's job
//! - Bytes that are not UTF-8 are rejected, never replaced

use std::collections::BTreeMap;
use std::string::FromUtf8Error;

use axum::extract::Query;
use axum::http::{HeaderMap, HeaderName, Method, Uri};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::inference::event::{HttpContext, InvocationEvent, RequestContext};

/// Header carrying the request correlation ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID from headers, or a fresh UUID v4 when absent or unreadable.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Body text, `None` when the body is empty.
pub fn decode_body(body: &[u8]) -> Result<Option<String>, FromUtf8Error> {
    if body.is_empty() {
        return Ok(None);
    }
    String::from_utf8(body.to_vec()).map(Some)
}

/// Build the invocation event for one HTTP request.
pub fn to_event(method: &Method, uri: &Uri, body: Option<String>) -> InvocationEvent {
    let body = body.map(Value::String);

    let query_string_parameters = uri.query().and_then(|_| {
        Query::<BTreeMap<String, String>>::try_from_uri(uri)
            .ok()
            .map(|Query(params)| {
                params
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect::<Map<String, Value>>()
            })
    });

    InvocationEvent {
        body,
        raw_path: Some(uri.path().to_string()),
        path: None,
        request_context: Some(RequestContext {
            request_id: None,
            http: Some(HttpContext {
                method: Some(method.as_str().to_string()),
            }),
        }),
        query_string_parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUEST_ID.clone(), HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }

    #[test]
    fn test_request_id_generated() {
        let id = request_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b"").unwrap(), None);
        assert_eq!(decode_body(b"{}").unwrap(), Some("{}".to_string()));
        assert!(decode_body(b"{\"monthly_spend\": \xff}").is_err());
    }

    #[test]
    fn test_event_with_body() {
        let uri: Uri = "/predict".parse().unwrap();
        let event = to_event(&Method::POST, &uri, Some(r#"{"monthly_spend": 30}"#.into()));
        assert_eq!(event.method(), "POST");
        assert_eq!(event.path(), "/predict");
        assert_eq!(event.body, Some(Value::String(r#"{"monthly_spend": 30}"#.into())));
        assert_eq!(event.query_string_parameters, None);
    }

    #[test]
    fn test_event_with_query() {
        let uri: Uri = "/predict?monthly_spend=30&tenure_months=2%2E5".parse().unwrap();
        let event = to_event(&Method::POST, &uri, None);
        assert_eq!(event.body, None);
        let query = event.query_string_parameters.unwrap();
        assert_eq!(query["monthly_spend"], "30");
        assert_eq!(query["tenure_months"], "2.5");
    }
}
