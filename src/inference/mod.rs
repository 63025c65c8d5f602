//! Inference subsystem.
//!
//! # Data Flow
//! ```text
//! InvocationEvent
//!     → endpoint.rs (route, dispatch, 500 on model failure)
//!     → handlers.rs
//!         health: fixed {"status": "ok"}
//!         predict: extract body → validate.rs → model → log → envelope
//!     → ResponseEnvelope
//! ```
//!
//! # Design Decisions
//! - Raw bodies become a typed FeatureRecord at the boundary
//! - No state survives an invocation except the shared model

pub mod endpoint;
pub mod event;
pub mod features;
pub mod handlers;
pub mod validate;

pub use endpoint::Endpoint;
pub use event::{InvocationEvent, ResponseEnvelope};
pub use features::{FeatureRecord, PredictionResult};
pub use validate::{validate, ValidationError};
