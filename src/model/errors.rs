//! Model error types
//!
//! All of these are fail-fast: they abort the construction, mutation,
//! derivation or resolution that caused them. Validation findings are not
//! errors and live in `crate::validation`.

use thiserror::Error;

use crate::mapping::MappingError;
use crate::schema::SchemaError;

/// Model error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Read or write of an attribute the schema does not declare
    #[error("model '{model}' declares no field '{field}'")]
    UndeclaredField { model: String, field: String },

    /// A dotted path ran through a value that is not an object
    #[error("model '{model}': '{path}' does not hold an object")]
    NotAnObject { model: String, path: String },

    /// Derivation named an unknown field
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Mapping lookup or resolution failed
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// No declaration with this name
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    /// A declaration with this name already exists
    #[error("model '{0}' is already declared")]
    DuplicateModel(String),

    /// The declaration reaches itself through `extends`
    #[error("model '{0}' extends itself through its ancestors")]
    CyclicDeclaration(String),

    /// A declaration could not be read or is inconsistent
    #[error("invalid definition '{source_name}': {reason}")]
    Definition { source_name: String, reason: String },
}

impl ModelError {
    pub fn undeclared(model: impl Into<String>, field: impl Into<String>) -> Self {
        ModelError::UndeclaredField {
            model: model.into(),
            field: field.into(),
        }
    }

    pub fn definition(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::Definition {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::UndeclaredField { .. } => "MODEL_UNDECLARED_FIELD",
            ModelError::NotAnObject { .. } => "MODEL_NOT_AN_OBJECT",
            ModelError::Schema(e) => e.code(),
            ModelError::Mapping(e) => e.code(),
            ModelError::UnknownModel(_) => "MODEL_UNKNOWN",
            ModelError::DuplicateModel(_) => "MODEL_DUPLICATE",
            ModelError::CyclicDeclaration(_) => "MODEL_CYCLIC",
            ModelError::Definition { .. } => "MODEL_DEFINITION",
        }
    }
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;
