//! Model artifact subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (cold start):
//!     artifact file (JSON)
//!     → logistic.rs (deserialize, check version / features / coefficients)
//!     → Arc<dyn ChurnModel> (immutable, shared by every invocation)
//!
//! Per request:
//!     [monthly_spend, tenure_months, num_support_tickets]
//!     → ChurnModel::churn_probability
//!     → P(churn) in [0, 1]
//! ```
//!
//! # Design Decisions
//! - Loaded exactly once; never mutated or reloaded
//! - Handlers receive the model through a trait object so tests can inject mocks

pub mod logistic;

use std::sync::Arc;

use thiserror::Error;

pub use logistic::LogisticModel;

/// Number of input features the classifier expects.
pub const FEATURE_COUNT: usize = 3;

/// Canonical feature order of the model input vector.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["monthly_spend", "tenure_months", "num_support_tickets"];

/// Errors produced while loading or invoking a model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode model artifact: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("unsupported model type '{0}'")]
    UnsupportedType(String),

    #[error("artifact features {found:?} do not match expected {expected:?}")]
    FeatureMismatch {
        found: Vec<String>,
        expected: Vec<String>,
    },

    #[error("artifact has {found} coefficients, expected {expected}")]
    CoefficientCount { found: usize, expected: usize },

    #[error("artifact parameter {0} is not a finite number")]
    NonFiniteParameter(String),

    #[error("model produced a non-finite probability for input {0:?}")]
    Numeric([f64; FEATURE_COUNT]),
}

/// A pre-trained binary churn classifier.
pub trait ChurnModel: Send + Sync {
    /// Probability of the positive (churn) class for one feature vector.
    fn churn_probability(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError>;
}

/// Shared read-only handle to the loaded model.
pub type SharedModel = Arc<dyn ChurnModel>;
