//! Mapping error types

use thiserror::Error;

/// Mapping error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// A named mapping was requested that the model type does not declare
    #[error("model '{model}' declares no mapping named '{mapping}'")]
    UnknownMapping { model: String, mapping: String },

    /// A mapping entry targets a field the schema does not declare
    #[error("mapping targets undeclared field '{field}'")]
    UnknownTarget { field: String },

    /// Raw input was not a structured object
    #[error("source data must be an object, got {actual}")]
    InvalidSource { actual: String },

    /// A source key expression had no usable candidate
    #[error("invalid source key expression '{expression}'")]
    InvalidExpression { expression: String },
}

impl MappingError {
    pub fn unknown_mapping(model: impl Into<String>, mapping: impl Into<String>) -> Self {
        MappingError::UnknownMapping {
            model: model.into(),
            mapping: mapping.into(),
        }
    }

    pub fn unknown_target(field: impl Into<String>) -> Self {
        MappingError::UnknownTarget {
            field: field.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            MappingError::UnknownMapping { .. } => "MAPPING_UNKNOWN",
            MappingError::UnknownTarget { .. } => "MAPPING_UNKNOWN_TARGET",
            MappingError::InvalidSource { .. } => "MAPPING_INVALID_SOURCE",
            MappingError::InvalidExpression { .. } => "MAPPING_INVALID_EXPRESSION",
        }
    }
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;
