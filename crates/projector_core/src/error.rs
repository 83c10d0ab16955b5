//! Error types for parameter validation.
//!
//! This module provides:
//! - `FieldViolation`: A single out-of-range or missing field with its reason
//! - `ParameterError`: The aggregate rejection returned by parameter validation

use std::fmt;
use thiserror::Error;

/// A single rejected input field.
///
/// # Examples
/// ```
/// use projector_core::FieldViolation;
///
/// let violation = FieldViolation::new("horizon", "must be between 1 and 365, got 0");
/// assert_eq!(format!("{}", violation), "horizon: must be between 1 and 365, got 0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldViolation {
    /// Name of the offending field as it appears on the wire
    pub field: String,
    /// Human-readable reason for the rejection
    pub reason: String,
}

impl FieldViolation {
    /// Creates a violation for `field` with the given reason.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Rejection of a simulation parameter set.
///
/// Validation never stops at the first failure; every offending field is
/// reported so the caller can fix the whole request in one round trip.
///
/// # Examples
/// ```
/// use projector_core::{FieldViolation, ParameterError};
///
/// let err = ParameterError::Invalid(vec![
///     FieldViolation::new("initial_value", "must be greater than 0, got 0"),
/// ]);
/// assert_eq!(
///     format!("{}", err),
///     "Invalid simulation parameters: initial_value: must be greater than 0, got 0"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// One or more fields outside their documented range
    #[error("Invalid simulation parameters: {}", join_violations(.0))]
    Invalid(Vec<FieldViolation>),
}

impl ParameterError {
    /// Returns the individual field violations.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ParameterError::Invalid(violations) => violations,
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let v = FieldViolation::new("path_count", "must be between 100 and 10000, got 50");
        assert_eq!(v.to_string(), "path_count: must be between 100 and 10000, got 50");
    }

    #[test]
    fn test_parameter_error_joins_all_violations() {
        let err = ParameterError::Invalid(vec![
            FieldViolation::new("initial_value", "bad"),
            FieldViolation::new("horizon", "worse"),
        ]);

        let msg = err.to_string();
        assert!(msg.starts_with("Invalid simulation parameters"));
        assert!(msg.contains("initial_value: bad"));
        assert!(msg.contains("horizon: worse"));
        assert_eq!(err.violations().len(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_violation_serialises_field_and_reason() {
        let v = FieldViolation::new("horizon", "too long");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["field"], "horizon");
        assert_eq!(json["reason"], "too long");
    }
}
