//! Validation findings
//!
//! These are values collected by `validate()`, never raised. A record may be
//! constructed, held and mutated while invalid.

use serde::Serialize;
use thiserror::Error;

/// A single validation finding. `path` is dotted for nested fields
/// (`address.postalCode`) and indexed for array elements (`tags[1]`).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// Required field holds no value
    #[error("field '{path}': required field is missing")]
    MissingRequiredField { path: String },

    /// Value does not match the declared type
    #[error("field '{path}': expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// String value rejected by the format checker
    #[error("field '{path}': value does not match format '{format}'")]
    FormatViolation { path: String, format: String },
}

impl ValidationError {
    pub fn missing(path: impl Into<String>) -> Self {
        ValidationError::MissingRequiredField { path: path.into() }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        ValidationError::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn format_violation(path: impl Into<String>, format: impl Into<String>) -> Self {
        ValidationError::FormatViolation {
            path: path.into(),
            format: format.into(),
        }
    }

    /// Path of the offending field
    pub fn path(&self) -> &str {
        match self {
            ValidationError::MissingRequiredField { path }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::FormatViolation { path, .. } => path,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredField { .. } => "VALIDATION_MISSING_REQUIRED_FIELD",
            ValidationError::TypeMismatch { .. } => "VALIDATION_TYPE_MISMATCH",
            ValidationError::FormatViolation { .. } => "VALIDATION_FORMAT_VIOLATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_includes_context() {
        let display = ValidationError::type_mismatch("age", "integer", "string").to_string();
        assert!(display.contains("age"));
        assert!(display.contains("integer"));
        assert!(display.contains("string"));
    }

    #[test]
    fn test_serialized_shape() {
        let value =
            serde_json::to_value(ValidationError::format_violation("email", "email")).unwrap();
        assert_eq!(
            value,
            json!({ "kind": "format_violation", "path": "email", "format": "email" })
        );
    }

    #[test]
    fn test_path_accessor() {
        assert_eq!(ValidationError::missing("address.city").path(), "address.city");
    }
}
