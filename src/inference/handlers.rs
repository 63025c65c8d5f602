//! Request handlers.
//!
//! Handlers are synchronous: each runs to completion and returns one
//! [`ResponseEnvelope`]. Only the predict handler can fail, and only when
//! the model itself fails.

use std::fmt::Display;
use std::time::Instant;

use serde_json::{json, Value};

use super::event::{InvocationEvent, ResponseEnvelope};
use super::features::{round_to, PredictionResult};
use super::validate::validate;
use crate::model::{ChurnModel, ModelError};
use crate::observability::metrics;
use crate::observability::{LogSink, RequestLog};
use crate::routing::router::PREDICT_PATH;

/// Decimal places kept in the logged latency.
const LATENCY_DECIMALS: i32 = 2;

/// `GET /health`.
pub fn health() -> ResponseEnvelope {
    ResponseEnvelope::json(200, &json!({ "status": "ok" }))
}

/// Any unmatched route.
pub fn not_found(method: &str, path: &str) -> ResponseEnvelope {
    ResponseEnvelope::error(404, &format!("Not found: {method} {path}"))
}

/// `POST /predict`.
///
/// Client errors (unparseable body, failed validation) become 400 responses
/// and are logged. A model failure is returned as `Err` for the caller to
/// deal with.
pub fn predict(
    event: &InvocationEvent,
    request_id: &str,
    model: &dyn ChurnModel,
    sink: &dyn LogSink,
) -> Result<ResponseEnvelope, ModelError> {
    let started = Instant::now();

    let body = match extract_body(event) {
        Ok(body) => body,
        Err((raw, err)) => return Ok(invalid_body(request_id, raw, &err, sink)),
    };
    let input = body.clone().unwrap_or(Value::Null);

    let record = match validate(body.as_ref()) {
        Ok(record) => record,
        Err(err) => {
            tracing::debug!(request_id = %request_id, error = %err, "Validation failed");
            let output = json!({ "error": err.to_string() });
            sink.write(&RequestLog {
                request_id: request_id.to_string(),
                route: PREDICT_PATH.to_string(),
                input,
                output: output.clone(),
                latency_ms: elapsed_ms(started),
                status: 400,
            });
            return Ok(ResponseEnvelope::json(400, &output));
        }
    };

    let probability = model.churn_probability(&record.to_array())?;
    metrics::record_prediction(probability);

    let result = PredictionResult::from_probability(probability);
    let output = json!(result);
    sink.write(&RequestLog {
        request_id: request_id.to_string(),
        route: PREDICT_PATH.to_string(),
        input,
        output: output.clone(),
        latency_ms: elapsed_ms(started),
        status: 200,
    });

    Ok(ResponseEnvelope::json(200, &output))
}

/// `POST /predict` with a body that cannot be parsed. Logged with zero
/// latency; `raw` is what the log records as input.
pub fn invalid_body(
    request_id: &str,
    raw: String,
    reason: &dyn Display,
    sink: &dyn LogSink,
) -> ResponseEnvelope {
    tracing::debug!(request_id = %request_id, error = %reason, "Unparseable request body");
    let output = json!({ "error": format!("Invalid JSON body: {reason}") });
    sink.write(&RequestLog {
        request_id: request_id.to_string(),
        route: PREDICT_PATH.to_string(),
        input: Value::String(raw),
        output: output.clone(),
        latency_ms: 0.0,
        status: 400,
    });
    ResponseEnvelope::json(400, &output)
}

/// Resolve the body: text is parsed as JSON, structured data is used as is,
/// and query string parameters stand in when there is no body at all.
fn extract_body(event: &InvocationEvent) -> Result<Option<Value>, (String, serde_json::Error)> {
    match &event.body {
        Some(Value::String(text)) => serde_json::from_str(text)
            .map(Some)
            .map_err(|err| (text.clone(), err)),
        Some(structured) => Ok(Some(structured.clone())),
        None => Ok(event
            .query_string_parameters
            .as_ref()
            .map(|query| Value::Object(query.clone()))),
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    round_to(started.elapsed().as_secs_f64() * 1000.0, LATENCY_DECIMALS)
}
