//! Metrics collection and exposition.
//!
//! # Metrics
//! - `churn_requests_total` (counter): requests by route, status
//! - `churn_request_duration_seconds` (histogram): latency by route
//! - `churn_predictions_total` (counter): successful model invocations
//! - `churn_probability` (histogram): distribution of returned probabilities
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed invocation.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "churn_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("churn_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one successful prediction.
pub fn record_prediction(probability: f64) {
    metrics::counter!("churn_predictions_total").increment(1);
    metrics::histogram!("churn_probability").record(probability);
}
