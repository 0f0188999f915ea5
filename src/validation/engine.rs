//! Validation engine
//!
//! Validation semantics:
//! - Fields are checked in schema declaration order
//! - Unset required fields yield `MissingRequiredField`
//! - Set fields must match their declared type; a mismatch stops further
//!   checks on that field
//! - Declared formats are checked on string values
//! - Object fields with declared properties are checked recursively, arrays
//!   with a declared element type element by element
//!
//! The validator never mutates values and never fails: findings are returned.

use serde_json::{Map, Value};

use super::checkers::{FormatChecker, JsonTypeChecker, StandardFormats, TypeChecker};
use super::errors::ValidationError;
use crate::mapping::{json_type_name, make_path};
use crate::schema::{FieldDef, FieldType, Schema};

/// Schema-driven validator parameterized by its type and format collaborators.
pub struct Validator<'a> {
    types: &'a dyn TypeChecker,
    formats: &'a dyn FormatChecker,
}

impl<'a> Validator<'a> {
    /// Creates a validator backed by the given collaborators.
    pub fn new(types: &'a dyn TypeChecker, formats: &'a dyn FormatChecker) -> Self {
        Self { types, formats }
    }

    /// Validates a field-value map against a schema.
    pub fn validate_fields(
        &self,
        schema: &Schema,
        values: &Map<String, Value>,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.validate_object(schema, values, "", &mut errors);
        errors
    }

    fn validate_object(
        &self,
        schema: &Schema,
        values: &Map<String, Value>,
        path_prefix: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        for (field_name, field_def) in schema.iter() {
            let field_path = make_path(path_prefix, field_name);

            match values.get(field_name) {
                Some(value) => self.validate_field(field_def, value, &field_path, errors),
                None => {
                    if field_def.required {
                        errors.push(ValidationError::missing(field_path));
                    }
                }
            }
        }
    }

    fn validate_field(
        &self,
        def: &FieldDef,
        value: &Value,
        field_path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if !self.validate_type(&def.field_type, value, field_path, errors) {
            return;
        }

        if let (Some(format), Some(text)) = (&def.format, value.as_str()) {
            if !self.formats.check_format(text, format) {
                errors.push(ValidationError::format_violation(field_path, format.as_str()));
            }
        }
    }

    /// Checks a value against a type, recursing into nested structure.
    /// Returns false if the value itself has the wrong type.
    fn validate_type(
        &self,
        expected: &FieldType,
        value: &Value,
        field_path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> bool {
        if !self.types.matches_type(value, expected.type_name()) {
            errors.push(ValidationError::type_mismatch(
                field_path,
                expected.type_name(),
                json_type_name(value),
            ));
            return false;
        }

        match (expected, value) {
            (FieldType::Object { properties }, Value::Object(obj)) if !properties.is_empty() => {
                self.validate_object(properties, obj, field_path, errors);
            }
            (FieldType::Array { items: Some(element_type) }, Value::Array(arr)) => {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}[{}]", field_path, i);
                    self.validate_type(element_type, elem, &elem_path, errors);
                }
            }
            _ => {}
        }

        true
    }
}

impl Validator<'static> {
    /// Validator using exact JSON typing and the lenient built-in formats.
    pub fn standard() -> Self {
        Validator::new(&JsonTypeChecker, &StandardFormats::LENIENT)
    }

    /// Validator using exact JSON typing and the strict built-in formats.
    pub fn strict() -> Self {
        Validator::new(&JsonTypeChecker, &StandardFormats::STRICT)
    }
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::standard()
    }
}
