//! Invocation entry point shared by the HTTP server and `invoke` command.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use super::event::{InvocationEvent, ResponseEnvelope};
use super::handlers;
use crate::model::SharedModel;
use crate::observability::{metrics, LogSink};
use crate::routing::{route, Route};

/// Message returned when the model fails during an invocation.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Routes invocations to handlers. Cheap to clone; all state is shared and
/// read-only.
#[derive(Clone)]
pub struct Endpoint {
    model: SharedModel,
    sink: Arc<dyn LogSink>,
}

impl Endpoint {
    pub fn new(model: SharedModel, sink: Arc<dyn LogSink>) -> Self {
        Self { model, sink }
    }

    /// Handle one invocation. Always produces an envelope: a model failure
    /// becomes a generic 500.
    pub fn handle(&self, event: &InvocationEvent, request_id: &str) -> ResponseEnvelope {
        let started = Instant::now();
        let method = event.method();
        let path = event.path();
        let matched = route(path, method);

        let response = match matched {
            Route::Health => handlers::health(),
            Route::Predict => {
                match handlers::predict(event, request_id, self.model.as_ref(), self.sink.as_ref()) {
                    Ok(response) => response,
                    Err(err) => {
                        tracing::error!(request_id = %request_id, error = %err, "Model invocation failed");
                        ResponseEnvelope::error(500, INTERNAL_ERROR_MESSAGE)
                    }
                }
            }
            Route::NotFound => {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, "No route matched");
                handlers::not_found(method, path)
            }
        };

        metrics::record_request(matched.label(), response.status_code, started);
        response
    }

    /// Handle an invocation whose body could not be decoded as text. `event`
    /// carries no body. Only predict reads the body, so every other route is
    /// served as usual.
    pub fn handle_undecodable(
        &self,
        event: &InvocationEvent,
        request_id: &str,
        raw: String,
        reason: &dyn Display,
    ) -> ResponseEnvelope {
        let matched = route(event.path(), event.method());
        if matched != Route::Predict {
            return self.handle(event, request_id);
        }

        let started = Instant::now();
        let response = handlers::invalid_body(request_id, raw, reason, self.sink.as_ref());
        metrics::record_request(matched.label(), response.status_code, started);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChurnModel, ModelError, FEATURE_COUNT};
    use crate::observability::MemorySink;
    use serde_json::json;

    struct FixedModel(f64);

    impl ChurnModel for FixedModel {
        fn churn_probability(&self, _features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
            Ok(self.0)
        }
    }

    struct FailingModel;

    impl ChurnModel for FailingModel {
        fn churn_probability(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
            Err(ModelError::Numeric(*features))
        }
    }

    fn endpoint_with(model: SharedModel) -> (Endpoint, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Endpoint::new(model, sink.clone()), sink)
    }

    #[test]
    fn test_health_not_logged() {
        let (endpoint, sink) = endpoint_with(Arc::new(FixedModel(0.5)));
        let response = endpoint.handle(&InvocationEvent::new("GET", "/health"), "r");
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body_json().unwrap(), json!({"status": "ok"}));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_unknown_route() {
        let (endpoint, sink) = endpoint_with(Arc::new(FixedModel(0.5)));
        let response = endpoint.handle(&InvocationEvent::new("GET", "/unknown"), "r");
        assert_eq!(response.status_code, 404);
        let error = response.body_json().unwrap()["error"].as_str().unwrap().to_string();
        assert!(error.contains("GET /unknown"));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_default_method_is_get() {
        let (endpoint, _) = endpoint_with(Arc::new(FixedModel(0.5)));
        let event: InvocationEvent = serde_json::from_value(json!({"rawPath": "/health"})).unwrap();
        assert_eq!(endpoint.handle(&event, "r").status_code, 200);

        let event: InvocationEvent = serde_json::from_value(json!({"rawPath": "/predict"})).unwrap();
        let response = endpoint.handle(&event, "r");
        assert_eq!(response.status_code, 404);
        assert_eq!(
            response.body_json().unwrap(),
            json!({"error": "Not found: GET /predict"})
        );
    }

    #[test]
    fn test_predict_logged_once() {
        let (endpoint, sink) = endpoint_with(Arc::new(FixedModel(0.42)));
        let event = InvocationEvent::new("POST", "/predict").with_body(json!({
            "monthly_spend": 10,
            "tenure_months": 1,
            "num_support_tickets": 0
        }));
        let response = endpoint.handle(&event, "req-42");
        assert_eq!(response.status_code, 200);
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].request_id, "req-42");
    }

    #[test]
    fn test_undecodable_body_on_predict() {
        let (endpoint, sink) = endpoint_with(Arc::new(FixedModel(0.5)));
        let event = InvocationEvent::new("POST", "/predict");
        let response = endpoint.handle_undecodable(&event, "r", "\u{FFFD}".into(), &"bad bytes");
        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.body_json().unwrap(),
            json!({"error": "Invalid JSON body: bad bytes"})
        );
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].latency_ms, 0.0);
    }

    #[test]
    fn test_undecodable_body_ignored_elsewhere() {
        let (endpoint, sink) = endpoint_with(Arc::new(FixedModel(0.5)));
        let event = InvocationEvent::new("GET", "/health");
        let response = endpoint.handle_undecodable(&event, "r", String::new(), &"bad bytes");
        assert_eq!(response.status_code, 200);
        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_model_failure_becomes_500() {
        let (endpoint, sink) = endpoint_with(Arc::new(FailingModel));
        let event = InvocationEvent::new("POST", "/predict").with_body(json!({
            "monthly_spend": 10,
            "tenure_months": 1,
            "num_support_tickets": 0
        }));
        let response = endpoint.handle(&event, "r");
        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body_json().unwrap(),
            json!({"error": "Internal server error"})
        );
        assert!(sink.records().is_empty());
    }
}
