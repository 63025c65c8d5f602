//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Map a (path, method) pair to a handler
//! - Return an explicit `NotFound` rather than a silent default
//!
//! # Design Decisions
//! - Exact, case-sensitive match on both path and method
//! - No prefix, wildcard, or trailing-slash normalization

pub const HEALTH_PATH: &str = "/health";
pub const PREDICT_PATH: &str = "/predict";

/// Handler selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    Predict,
    NotFound,
}

impl Route {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Health => HEALTH_PATH,
            Route::Predict => PREDICT_PATH,
            Route::NotFound => "unmatched",
        }
    }
}

/// Look up the handler for a request.
pub fn route(path: &str, method: &str) -> Route {
    match (path, method) {
        (HEALTH_PATH, "GET") => Route::Health,
        (PREDICT_PATH, "POST") => Route::Predict,
        _ => Route::NotFound,
    }
}
