//! Logistic regression classifier loaded from a JSON artifact.
//!
//! The artifact is produced offline by fitting a logistic regression on the
//! three raw (unscaled) features.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ChurnModel, ModelError, FEATURE_COUNT, FEATURE_NAMES};

/// Artifact format version this build understands.
pub const FORMAT_VERSION: u32 = 1;

const MODEL_TYPE: &str = "logistic_regression";

/// On-disk representation of the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model_type: String,
    pub features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// A validated, immutable logistic regression model.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticModel {
    /// Build a model directly from its parameters.
    pub fn new(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Result<Self, ModelError> {
        for (name, value) in FEATURE_NAMES.iter().zip(coefficients.iter()) {
            if !value.is_finite() {
                return Err(ModelError::NonFiniteParameter(format!("coefficient[{name}]")));
            }
        }
        if !intercept.is_finite() {
            return Err(ModelError::NonFiniteParameter("intercept".to_string()));
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Load and validate an artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let bytes = fs::read(path)?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
        Self::from_artifact(artifact)
    }

    /// Validate a decoded artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: artifact.format_version,
                expected: FORMAT_VERSION,
            });
        }
        if artifact.model_type != MODEL_TYPE {
            return Err(ModelError::UnsupportedType(artifact.model_type));
        }
        if artifact.features.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ModelError::FeatureMismatch {
                found: artifact.features,
                expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            });
        }
        let coefficients: [f64; FEATURE_COUNT] =
            artifact
                .coefficients
                .as_slice()
                .try_into()
                .map_err(|_| ModelError::CoefficientCount {
                    found: artifact.coefficients.len(),
                    expected: FEATURE_COUNT,
                })?;

        Self::new(coefficients, artifact.intercept)
    }

    /// Convert back to the on-disk representation.
    #[cfg(test)]
    pub fn to_artifact(&self) -> ModelArtifact {
        ModelArtifact {
            format_version: FORMAT_VERSION,
            model_type: MODEL_TYPE.to_string(),
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: self.coefficients.to_vec(),
            intercept: self.intercept,
        }
    }

    /// Linear decision value `b + w·x`.
    pub fn decision_function(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        self.coefficients
            .iter()
            .zip(features.iter())
            .fold(self.intercept, |acc, (w, x)| acc + w * x)
    }
}

impl ChurnModel for LogisticModel {
    fn churn_probability(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        let probability = sigmoid(self.decision_function(features));
        if probability.is_finite() {
            Ok(probability)
        } else {
            Err(ModelError::Numeric(*features))
        }
    }
}

/// Logistic function, stable for large |z|.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
