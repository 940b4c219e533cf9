//! # Error Types
//!
//! Structured error types for concrete_core. The calculation engines never
//! fail on contract-satisfying input; every error here comes from the
//! validation layer or from loading a correction-table override.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::errors::{CalcError, CalcResult};
//!
//! fn check_load(load_kn: f64) -> CalcResult<()> {
//!     if load_kn <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "breaking_load_kn",
//!             load_kn.to_string(),
//!             "Breaking load must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for concrete_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for validation and configuration failures.
///
/// Field names are full paths into the submitted batch
/// (e.g. `samples[2].lengths_mm[1]`) so a caller can point at the offending value.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-positive, not finite, out of range)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A list has the wrong number of entries
    #[error("Invalid count for '{field}': got {actual}, expected {expected}")]
    InvalidCount {
        field: String,
        actual: usize,
        expected: String,
    },

    /// A correction table override is malformed
    #[error("Invalid correction table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidCount error
    pub fn invalid_count(field: impl Into<String>, actual: usize, expected: impl Into<String>) -> Self {
        CalcError::InvalidCount {
            field: field.into(),
            actual,
            expected: expected.into(),
        }
    }

    /// Create an InvalidTable error
    pub fn invalid_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidTable {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidCount { .. } => "INVALID_COUNT",
            CalcError::InvalidTable { .. } => "INVALID_TABLE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Join a parent path and a field name (`samples[1]` + `lengths_mm`).
pub(crate) fn field(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(field: impl Into<String>, value: f64, what: &str) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            format!("{} must be a positive number", what),
        ));
    }
    Ok(())
}

/// Reject non-finite or negative values.
pub(crate) fn require_non_negative(field: impl Into<String>, value: f64, what: &str) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            format!("{} cannot be negative", what),
        ));
    }
    Ok(())
}

/// Reject lists whose length falls outside `min..=max`.
pub(crate) fn require_count(field: impl Into<String>, actual: usize, min: usize, max: Option<usize>) -> CalcResult<()> {
    let too_many = max.is_some_and(|m| actual > m);
    if actual < min || too_many {
        let expected = match max {
            Some(m) if m == min => format!("exactly {}", min),
            Some(m) => format!("{} to {}", min, m),
            None => format!("at least {}", min),
        };
        return Err(CalcError::invalid_count(field, actual, expected));
    }
    Ok(())
}
