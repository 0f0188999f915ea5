//! Schema error types
//!
//! Error codes:
//! - SCHEMA_DERIVATION_UNKNOWN_FIELD (raised at type-definition time)

use std::fmt;

use thiserror::Error;

/// Structural derivation operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeriveOp {
    Exclude,
    Subset,
}

impl DeriveOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeriveOp::Exclude => "exclude",
            DeriveOp::Subset => "subset",
        }
    }
}

impl fmt::Display for DeriveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// `exclude`/`subset` named a field the schema does not declare
    #[error("cannot {op} field '{field}': not declared in schema")]
    UnknownField { op: DeriveOp, field: String },
}

impl SchemaError {
    pub fn unknown_field(op: DeriveOp, field: impl Into<String>) -> Self {
        SchemaError::UnknownField {
            op,
            field: field.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownField { .. } => "SCHEMA_DERIVATION_UNKNOWN_FIELD",
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SchemaError::unknown_field(DeriveOp::Exclude, "x").code(),
            "SCHEMA_DERIVATION_UNKNOWN_FIELD"
        );
    }

    #[test]
    fn test_display_names_operation_and_field() {
        let display = SchemaError::unknown_field(DeriveOp::Subset, "nickname").to_string();
        assert!(display.contains("subset"));
        assert!(display.contains("nickname"));
    }
}
