//! Request body validation.
//!
//! Converts an untyped JSON body into a [`FeatureRecord`], failing on the
//! first violated constraint in this order:
//!
//! 1. body absent
//! 2. body not an object
//! 3. missing fields (all of them reported together)
//! 4. wrong type, per field in canonical order
//! 5. negative value, per field in canonical order
//! 6. upper bounds: `tenure_months`, `monthly_spend`, `num_support_tickets`

use serde_json::{Map, Value};
use thiserror::Error;

use super::features::FeatureRecord;
use crate::model::FEATURE_NAMES;

pub const MAX_MONTHLY_SPEND: f64 = 100_000.0;
pub const MAX_TENURE_MONTHS: f64 = 600.0;
pub const MAX_SUPPORT_TICKETS: f64 = 1_000.0;

/// Order in which upper bounds are checked, as (field index, maximum).
const RANGE_CHECKS: [(usize, f64); 3] = [
    (1, MAX_TENURE_MONTHS),
    (0, MAX_MONTHLY_SPEND),
    (2, MAX_SUPPORT_TICKETS),
];

/// Why a request body was rejected. The `Display` text is returned to callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Request body is required")]
    BodyRequired,

    #[error("Request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Field '{field}' must be a number, got {found}")]
    WrongType {
        field: &'static str,
        found: &'static str,
    },

    #[error("Field '{field}' must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("Field '{field}' is out of range: {value} exceeds maximum of {max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        max: f64,
    },
}

/// Validate a raw body. `None` and JSON `null` both mean "no body".
pub fn validate(body: Option<&Value>) -> Result<FeatureRecord, ValidationError> {
    let fields = match body {
        None | Some(Value::Null) => return Err(ValidationError::BodyRequired),
        Some(Value::Object(map)) => map,
        Some(other) => return Err(ValidationError::NotAnObject(json_type_name(other))),
    };

    let missing: Vec<&'static str> = FEATURE_NAMES
        .iter()
        .copied()
        .filter(|name| !fields.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let values = parse_fields(fields)?;

    for (field, value) in FEATURE_NAMES.into_iter().zip(values) {
        if value < 0.0 {
            return Err(ValidationError::Negative { field, value });
        }
    }

    for (index, max) in RANGE_CHECKS {
        if values[index] > max {
            return Err(ValidationError::OutOfRange {
                field: FEATURE_NAMES[index],
                value: values[index],
                max,
            });
        }
    }

    let [monthly_spend, tenure_months, num_support_tickets] = values;
    Ok(FeatureRecord {
        monthly_spend,
        tenure_months,
        num_support_tickets,
    })
}

fn parse_fields(fields: &Map<String, Value>) -> Result<[f64; 3], ValidationError> {
    let mut values = [0.0; 3];
    for (slot, field) in values.iter_mut().zip(FEATURE_NAMES) {
        *slot = match fields.get(field) {
            Some(raw) => parse_number(field, raw)?,
            None => return Err(ValidationError::MissingFields(vec![field])),
        };
    }
    Ok(values)
}

/// Accept JSON numbers and strings holding a float literal.
fn parse_number(field: &'static str, raw: &Value) -> Result<f64, ValidationError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(ValidationError::WrongType {
            field,
            found: "non-finite number",
        }),
        None => Err(ValidationError::WrongType {
            field,
            found: json_type_name(raw),
        }),
    }
}

/// Human-readable JSON type name used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
