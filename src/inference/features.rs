//! Feature record and prediction result types.

use serde::{Deserialize, Serialize};

use crate::model::FEATURE_COUNT;

/// Decimal places kept in the returned probability.
pub const PROBABILITY_DECIMALS: i32 = 4;

/// Normalized, validated model input for one customer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub monthly_spend: f64,
    pub tenure_months: f64,
    pub num_support_tickets: f64,
}

impl FeatureRecord {
    /// Feature vector in the model's fixed input order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.monthly_spend,
            self.tenure_months,
            self.num_support_tickets,
        ]
    }
}

/// Response payload of a successful prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub churn_probability: f64,
}

impl PredictionResult {
    /// Wrap a raw model probability, rounding it for the response.
    pub fn from_probability(probability: f64) -> Self {
        Self {
            churn_probability: round_to(probability, PROBABILITY_DECIMALS),
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
