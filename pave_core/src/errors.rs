//! # Error Types
//!
//! Structured error types for pave_core. Every failure names the offending
//! parameter (or axis, or bracket) so that a form or report collaborator can
//! point the user at the exact input that needs to change, rather than
//! showing a generic "calculation error".
//!
//! ## Example
//!
//! ```rust
//! use pave_core::errors::{CalcError, CalcResult};
//!
//! fn validate_modulus(mr_psi: f64) -> CalcResult<()> {
//!     if mr_psi <= 0.0 {
//!         return Err(CalcError::InvalidDomainInput {
//!             field: "subgrade_mr_psi".to_string(),
//!             value: mr_psi.to_string(),
//!             reason: "Support modulus must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pave_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for design operations.
///
/// Two locally-recovered conditions are deliberately *not* variants here:
/// a degenerate layer (zero layer or drainage coefficient) is reported as a
/// zero minimum thickness on that layer, and a non-positive rigid
/// strength/support ratio is reported as [`Capacity::None`](crate::calculations::rigid::Capacity).
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A precondition on an input value is violated before any computation starts
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidDomainInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The residual does not change sign across the search bracket
    #[error(
        "No root in bracket [{lower}, {upper}]: residuals {residual_lower} and {residual_upper} share a sign - design target is outside the design envelope"
    )]
    NoRootInBracket {
        lower: f64,
        upper: f64,
        residual_lower: f64,
        residual_upper: f64,
    },

    /// The root finder exhausted its iteration budget
    #[error("Root finder did not converge within {max_iterations} iterations (last estimate {last_estimate})")]
    IterationLimitReached {
        max_iterations: usize,
        last_estimate: f64,
    },

    /// Fewer than two usable calibration points for a nomograph axis
    #[error("Insufficient calibration for axis '{axis}': {reason}")]
    InsufficientCalibration { axis: String, reason: String },

    /// Material not found in the catalog
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// A nomograph chart has no axis with the requested name
    #[error("Axis not found: {axis}")]
    AxisNotFound { axis: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidDomainInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidDomainInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InsufficientCalibration error
    pub fn insufficient_calibration(axis: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InsufficientCalibration {
            axis: axis.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True when the inputs are well-formed but no design exists for them
    /// (the target lies outside what the search bracket can satisfy).
    pub fn is_design_envelope(&self) -> bool {
        matches!(self, CalcError::NoRootInBracket { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidDomainInput { .. } => "INVALID_DOMAIN_INPUT",
            CalcError::NoRootInBracket { .. } => "NO_ROOT_IN_BRACKET",
            CalcError::IterationLimitReached { .. } => "ITERATION_LIMIT_REACHED",
            CalcError::InsufficientCalibration { .. } => "INSUFFICIENT_CALIBRATION",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::AxisNotFound { .. } => "AXIS_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

/// Reject NaN and infinities with a field-specific error.
pub(crate) fn require_finite(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Value must be a finite number"));
    }
    Ok(())
}

/// Reject values that are not strictly positive (NaN included).
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Value must be positive"));
    }
    Ok(())
}

/// Reject negative values (zero allowed).
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Value cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("subgrade_mr_psi", "-5.0", "Support modulus must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("InvalidDomainInput"));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::insufficient_calibration("k", "one point").error_code(),
            "INSUFFICIENT_CALIBRATION"
        );
        assert_eq!(CalcError::material_not_found("granite").error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_design_envelope_classification() {
        let no_root = CalcError::NoRootInBracket {
            lower: 0.01,
            upper: 25.0,
            residual_lower: 20.0,
            residual_upper: 5.0,
        };
        assert!(no_root.is_design_envelope());
        assert!(!CalcError::invalid_input("so", "0", "bad").is_design_envelope());
    }

    #[test]
    fn test_require_helpers() {
        assert!(require_positive("x", 1.0).is_ok());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", f64::NAN).is_err());
        assert!(require_non_negative("x", 0.0).is_ok());
        assert!(require_non_negative("x", -0.1).is_err());
        assert!(require_finite("x", f64::INFINITY).is_err());
    }
}
