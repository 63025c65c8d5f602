//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Endpoint / handlers produce:
//!     → logging.rs (tracing events on stderr, request lines on stdout)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows into every request line
//! - Request lines and operational logs use separate streams

pub mod logging;
pub mod metrics;

pub use logging::{LogSink, MemorySink, NullSink, RequestLog, StdoutSink};
