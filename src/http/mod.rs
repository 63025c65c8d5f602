//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → middleware.rs (non-JSON error responses → {"error": ...})
//!     → request.rs (request ID, HTTP request → InvocationEvent)
//!     → inference::Endpoint (route, handle)
//!     → response.rs (ResponseEnvelope → HTTP response)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
