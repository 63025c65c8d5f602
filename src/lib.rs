//! Churn prediction endpoint library.

pub mod config;
pub mod http;
pub mod inference;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod routing;

pub use config::EndpointConfig;
pub use http::HttpServer;
pub use inference::{Endpoint, InvocationEvent, ResponseEnvelope};
pub use lifecycle::Shutdown;
