//! Invocation events in the shape delivered by a serverless runtime.

use serde_json::{json, Value};

use churn_endpoint::{InvocationEvent, ResponseEnvelope};

mod common;

fn invoke(event: Value) -> (ResponseEnvelope, Value) {
    let (endpoint, _) = common::endpoint_with(common::sample_model());
    let event: InvocationEvent = serde_json::from_value(event).unwrap();
    let response = endpoint.handle(&event, "invoke-test");
    let body = response.body_json().unwrap();
    (response, body)
}

#[test]
fn test_text_body() {
    let (response, body) = invoke(json!({
        "rawPath": "/predict",
        "requestContext": {"http": {"method": "POST"}},
        "body": "{\"monthly_spend\": 30, \"tenure_months\": 2, \"num_support_tickets\": 5}"
    }));
    assert_eq!(response.status_code, 200);
    assert_eq!(response.headers["Content-Type"], "application/json");
    assert!(body["churn_probability"].as_f64().unwrap() > 0.5);
}

#[test]
fn test_pre_parsed_body() {
    let (response, body) = invoke(json!({
        "path": "/predict",
        "requestContext": {"http": {"method": "POST"}},
        "body": {"monthly_spend": 90, "tenure_months": 24, "num_support_tickets": 1}
    }));
    assert_eq!(response.status_code, 200);
    assert!(body["churn_probability"].as_f64().unwrap() < 0.5);
}

#[test]
fn test_query_parameters_without_body() {
    let (response, body) = invoke(json!({
        "rawPath": "/predict",
        "requestContext": {"http": {"method": "POST"}},
        "queryStringParameters": {
            "monthly_spend": "20",
            "tenure_months": "1",
            "num_support_tickets": "9"
        }
    }));
    assert_eq!(response.status_code, 200);
    assert!(body["churn_probability"].as_f64().unwrap() > 0.5);
}

#[test]
fn test_null_query_parameters_without_body() {
    let (response, body) = invoke(json!({
        "path": "/predict",
        "requestContext": {"http": {"method": "POST"}},
        "body": null,
        "queryStringParameters": null
    }));
    assert_eq!(response.status_code, 400);
    assert_eq!(
        body,
        json!({"error": "Missing required field(s): monthly_spend, tenure_months, num_support_tickets"})
    );
}

#[test]
fn test_query_parameter_wrong_type() {
    let (response, body) = invoke(json!({
        "rawPath": "/predict",
        "requestContext": {"http": {"method": "POST"}},
        "queryStringParameters": {
            "monthly_spend": "twenty",
            "tenure_months": "1",
            "num_support_tickets": "9"
        }
    }));
    assert_eq!(response.status_code, 400);
    assert_eq!(body, json!({"error": "Field 'monthly_spend' must be a number, got string"}));
}

#[test]
fn test_missing_method_defaults_to_get() {
    let (response, body) = invoke(json!({"rawPath": "/health"}));
    assert_eq!(response.status_code, 200);
    assert_eq!(body, json!({"status": "ok"}));
}

#[test]
fn test_envelope_serialization() {
    let (response, _) = invoke(json!({"rawPath": "/nope", "requestContext": {"http": {"method": "DELETE"}}}));
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["statusCode"], 404);
    assert_eq!(value["headers"], json!({"Content-Type": "application/json"}));
    assert_eq!(
        serde_json::from_str::<Value>(value["body"].as_str().unwrap()).unwrap(),
        json!({"error": "Not found: DELETE /nope"})
    );
}
