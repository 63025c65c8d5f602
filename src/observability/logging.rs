//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the operational log (tracing → stderr)
//! - Emit one structured JSON line per prediction request (stdout)
//!
//! # Design Decisions
//! - Uses tracing crate for operational logs, pretty or JSON per config
//! - Request lines go through a [`LogSink`] so tests can capture them
//! - Writing a request line is best effort; failures are ignored

use std::io::Write;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

const DEFAULT_FILTER: &str = "churn_endpoint=info,tower_http=info";

/// Install the global tracing subscriber.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// One line of the per-request log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLog {
    pub request_id: String,
    pub route: String,
    pub input: Value,
    pub output: Value,
    pub latency_ms: f64,
    pub status: u16,
}

/// Destination for request log lines.
pub trait LogSink: Send + Sync {
    fn write(&self, record: &RequestLog);
}

/// Writes each record as one JSON line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, record: &RequestLog) {
        let Ok(line) = serde_json::to_string(record) else {
            return;
        };
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _record: &RequestLog) {}
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<RequestLog>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn records(&self) -> Vec<RequestLog> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn write(&self, record: &RequestLog) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}
