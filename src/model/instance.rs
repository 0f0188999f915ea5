//! Sealed model instances
//!
//! An instance owns a map from declared field name to value. A field is unset
//! when its key is absent. Only names in the type's schema can be read or
//! written; anything else fails with `UndeclaredField`.
//!
//! Provenance lives in a separate `Metadata` value that field enumeration,
//! equality and serialization never look at.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::errors::{ModelError, ModelResult};
use super::model_type::ModelType;
use crate::mapping::make_path;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{FieldDef, Schema};
use crate::serializer;
use crate::validation::{ValidationError, Validator};

/// How an instance's values were obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingProvenance {
    /// Fields read under their own names (or no data at all)
    Identity,
    /// Through a mapping declared on the type
    Named(String),
    /// Through a caller-supplied mapping
    AdHoc,
}

impl MappingProvenance {
    pub fn label(&self) -> &str {
        match self {
            MappingProvenance::Identity => "identity",
            MappingProvenance::Named(name) => name,
            MappingProvenance::AdHoc => "ad-hoc",
        }
    }
}

/// Out-of-band instance metadata
#[derive(Debug, Clone)]
pub struct Metadata {
    model: String,
    mapping: MappingProvenance,
    constructed_at: DateTime<Utc>,
}

impl Metadata {
    pub(crate) fn new(model: &str, mapping: MappingProvenance) -> Self {
        Self {
            model: model.to_string(),
            mapping,
            constructed_at: Utc::now(),
        }
    }

    /// Name of the type the instance was constructed as
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Mapping used at construction
    pub fn mapping(&self) -> &MappingProvenance {
        &self.mapping
    }

    pub fn constructed_at(&self) -> DateTime<Utc> {
        self.constructed_at
    }
}

/// A sealed record bound to one model type.
#[derive(Debug, Clone)]
pub struct Instance {
    model: ModelType,
    values: Map<String, Value>,
    metadata: Metadata,
}

impl Instance {
    pub(crate) fn from_parts(
        model: ModelType,
        values: Map<String, Value>,
        metadata: Metadata,
    ) -> Self {
        Self {
            model,
            values,
            metadata,
        }
    }

    pub fn model(&self) -> &ModelType {
        &self.model
    }

    pub fn schema(&self) -> &Schema {
        self.model.schema()
    }

    /// Set fields only, keyed by declared name
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Declared fields in schema order with their current value.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.schema()
            .names()
            .map(move |name| (name, self.values.get(name)))
    }

    /// Current value of a declared field; `None` when unset.
    pub fn get(&self, name: &str) -> ModelResult<Option<&Value>> {
        self.check_declared(name)?;
        Ok(self.values.get(name))
    }

    /// Assigns a declared field. Object values must not carry keys the
    /// field's properties do not declare.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> ModelResult<()> {
        self.check_declared(name)?;
        let value = value.into();
        self.check_nested(name, &value)?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Clears a declared field, returning its previous value.
    pub fn unset(&mut self, name: &str) -> ModelResult<Option<Value>> {
        self.check_declared(name)?;
        Ok(self.values.remove(name))
    }

    /// Whether a declared field holds a value. Undeclared names are never set.
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Reads a dotted path through declared nested properties.
    ///
    /// Returns `Ok(None)` if any object along the path is unset or not an
    /// object.
    pub fn get_path(&self, path: &str) -> ModelResult<Option<&Value>> {
        self.check_declared_path(path)?;

        let mut segments = path.split('.');
        let mut current = match segments.next().and_then(|first| self.values.get(first)) {
            Some(value) => value,
            None => return Ok(None),
        };
        for segment in segments {
            current = match current.as_object().and_then(|obj| obj.get(segment)) {
                Some(value) => value,
                None => return Ok(None),
            };
        }
        Ok(Some(current))
    }

    /// Assigns a dotted path through declared nested properties, creating
    /// empty intermediate objects as needed.
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) -> ModelResult<()> {
        self.check_declared_path(path)?;
        let value = value.into();
        self.check_nested(path, &value)?;

        let segments: Vec<&str> = path.split('.').collect();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(self.reject(path)),
        };

        let mut target = &mut self.values;
        let mut walked = String::new();
        for segment in parents {
            walked = make_path(&walked, segment);
            let slot = target
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            target = match slot {
                Value::Object(obj) => obj,
                _ => {
                    return Err(ModelError::NotAnObject {
                        model: self.model.name().to_string(),
                        path: walked,
                    })
                }
            };
        }
        target.insert(last.to_string(), value);
        Ok(())
    }

    /// Out-of-band provenance; never part of the field surface.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Validates with the standard validator.
    pub fn validate(&self) -> Vec<ValidationError> {
        self.validate_with(&Validator::standard())
    }

    /// Validates with the given validator.
    pub fn validate_with(&self, validator: &Validator<'_>) -> Vec<ValidationError> {
        let errors = validator.validate_fields(self.schema(), &self.values);
        let error_count = errors.len().to_string();
        log_event_with_fields(
            Event::ValidationCompleted,
            &[("errors", error_count.as_str()), ("model", self.model.name())],
        );
        errors
    }

    /// Plain structured form: set, declared fields only.
    pub fn serialize(&self) -> Value {
        serializer::to_value(self)
    }

    fn check_declared(&self, name: &str) -> ModelResult<()> {
        if self.schema().contains(name) {
            Ok(())
        } else {
            Err(self.reject(name))
        }
    }

    fn check_declared_path(&self, path: &str) -> ModelResult<()> {
        if self.schema().lookup_path(path).is_some() {
            Ok(())
        } else {
            Err(self.reject(path))
        }
    }

    fn check_nested(&self, path: &str, value: &Value) -> ModelResult<()> {
        let undeclared = self
            .schema()
            .lookup_path(path)
            .and_then(|def| undeclared_key(def, value, path));
        match undeclared {
            Some(nested) => Err(self.reject(&nested)),
            None => Ok(()),
        }
    }

    fn reject(&self, name: &str) -> ModelError {
        log_event_with_fields(
            Event::UndeclaredFieldRejected,
            &[("field", name), ("model", self.model.name())],
        );
        self.model.undeclared(name)
    }
}

/// Dotted path of the first key in `value` that `def`'s properties do not
/// declare. Free-form objects and non-object values have none.
fn undeclared_key(def: &FieldDef, value: &Value, path: &str) -> Option<String> {
    let (properties, object) = match (def.properties(), value) {
        (Some(properties), Value::Object(object)) => (properties, object),
        _ => return None,
    };
    object.iter().find_map(|(key, sub)| {
        let sub_path = make_path(path, key);
        match properties.get(key) {
            Some(sub_def) => undeclared_key(sub_def, sub, &sub_path),
            None => Some(sub_path),
        }
    })
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.model.same_type(&other.model) && self.values == other.values
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer::to_value(self).serialize(serializer)
    }
}
