//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Invocation event (path, method)
//!     → router.rs (exact lookup)
//!     → Return: Health | Predict | NotFound
//! ```
//!
//! # Design Decisions
//! - Routes are fixed at compile time
//! - Deterministic: same input always matches same route

pub mod router;

pub use router::{route, Route};
