//! Model type descriptors
//!
//! A `ModelType` is a data value: a name, its resolved schema and its named
//! mapping table. Derived types (`extend`, `exclude`, `subset`) are new values
//! built from an existing one; sealing, mapping, validation and serialization
//! are all driven by the schema they carry, so every type shares one code path.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::errors::{ModelError, ModelResult};
use super::instance::{Instance, MappingProvenance, Metadata};
use crate::mapping::{self, MappingError, MappingSelector, MappingSpec};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{merge, Restriction, Schema};

/// Name of the root abstraction
pub const ROOT_MODEL: &str = "Model";

/// Options accepted at construction time
#[derive(Debug, Clone, Default)]
pub struct ConstructOptions {
    /// Mapping to apply to the raw data; identity when absent
    pub mapping: Option<MappingSelector>,
}

impl ConstructOptions {
    pub fn with_mapping(mapping: impl Into<MappingSelector>) -> Self {
        Self {
            mapping: Some(mapping.into()),
        }
    }
}

/// A model type: schema plus named mappings.
///
/// Cloning is cheap; schema and mappings are shared.
#[derive(Debug, Clone)]
pub struct ModelType {
    name: String,
    parent: Option<String>,
    schema: Arc<Schema>,
    mappings: Arc<BTreeMap<String, MappingSpec>>,
}

impl ModelType {
    /// The root abstraction: empty schema, no mappings.
    pub fn root() -> Self {
        Self::define(ROOT_MODEL, Schema::new())
    }

    /// A type whose schema is exactly its declared set.
    pub fn define(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            parent: None,
            schema: Arc::new(schema),
            mappings: Arc::new(BTreeMap::new()),
        }
    }

    /// A type extending this one. Own declarations override on name collision.
    /// Named mappings are inherited.
    pub fn extend(&self, name: impl Into<String>, delta: Schema) -> Self {
        let extended = Self {
            name: name.into(),
            parent: Some(self.name.clone()),
            schema: Arc::new(merge(&self.schema, &delta)),
            mappings: Arc::clone(&self.mappings),
        };
        let field_count = extended.schema.len().to_string();
        log_event_with_fields(
            Event::SchemaResolved,
            &[
                ("model", extended.name.as_str()),
                ("parent", self.name.as_str()),
                ("fields", field_count.as_str()),
            ],
        );
        extended
    }

    /// A type without the named fields.
    pub fn exclude(&self, names: &[&str]) -> ModelResult<Self> {
        let derived = self.restrict(&Restriction {
            exclude: names.iter().map(|n| n.to_string()).collect(),
            subset: None,
        })?;
        Ok(derived.named(format!("{}.exclude({})", self.name, names.join(", "))))
    }

    /// A type keeping only the named fields.
    pub fn subset(&self, names: &[&str]) -> ModelResult<Self> {
        let derived = self.restrict(&Restriction {
            exclude: Vec::new(),
            subset: Some(names.iter().map(|n| n.to_string()).collect()),
        })?;
        Ok(derived.named(format!("{}.subset({})", self.name, names.join(", "))))
    }

    /// Applies a structural restriction. Inherited mappings are pruned to the
    /// fields that survive.
    pub fn restrict(&self, restriction: &Restriction) -> ModelResult<Self> {
        let schema = restriction.apply(&self.schema)?;
        let mappings = self
            .mappings
            .iter()
            .map(|(name, spec)| (name.clone(), spec.pruned_to(&schema)))
            .collect();

        let field_count = schema.len().to_string();
        log_event_with_fields(
            Event::TypeDerived,
            &[("model", self.name.as_str()), ("fields", field_count.as_str())],
        );

        Ok(Self {
            name: self.name.clone(),
            parent: Some(self.name.clone()),
            schema: Arc::new(schema),
            mappings: Arc::new(mappings),
        })
    }

    /// Renames the type, e.g. to name an anonymous derived type.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds or replaces a named mapping.
    ///
    /// # Errors
    ///
    /// `UnknownTarget` if the mapping names a field the schema does not declare.
    pub fn with_mapping(mut self, name: impl Into<String>, spec: MappingSpec) -> ModelResult<Self> {
        spec.check_targets(&self.schema)?;
        Arc::make_mut(&mut self.mappings).insert(name.into(), spec);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the type this one was derived from
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Resolved schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Named mapping table
    pub fn mappings(&self) -> &BTreeMap<String, MappingSpec> {
        &self.mappings
    }

    /// Looks up a named mapping.
    pub fn mapping(&self, name: &str) -> ModelResult<&MappingSpec> {
        self.mappings
            .get(name)
            .ok_or_else(|| MappingError::unknown_mapping(&self.name, name).into())
    }

    pub(crate) fn undeclared(&self, field: &str) -> ModelError {
        ModelError::undeclared(&self.name, field)
    }

    /// Whether two values describe the same type
    pub fn same_type(&self, other: &ModelType) -> bool {
        self.name == other.name
            && (Arc::ptr_eq(&self.schema, &other.schema) || self.schema == other.schema)
    }

    /// An empty instance; every field unset.
    pub fn instantiate(&self) -> Instance {
        Instance::from_parts(
            self.clone(),
            Map::new(),
            Metadata::new(&self.name, MappingProvenance::Identity),
        )
    }

    /// Builds an instance from optional raw data.
    ///
    /// # Errors
    ///
    /// - `UnknownMapping` if a named mapping is not declared
    /// - `UnknownTarget` if an ad hoc mapping names an undeclared field
    /// - `InvalidSource` if raw data is not an object
    pub fn construct(
        &self,
        raw: Option<&Value>,
        options: ConstructOptions,
    ) -> ModelResult<Instance> {
        let (spec, provenance) = match &options.mapping {
            None => (None, MappingProvenance::Identity),
            Some(MappingSelector::Named(name)) => {
                (Some(self.mapping(name)?), MappingProvenance::Named(name.clone()))
            }
            Some(MappingSelector::AdHoc(spec)) => (Some(spec), MappingProvenance::AdHoc),
        };

        let values = match raw {
            Some(raw) => mapping::resolve(&self.schema, raw, spec)?,
            None => {
                if let Some(spec) = spec {
                    spec.check_targets(&self.schema)?;
                }
                Map::new()
            }
        };

        if spec.is_some() {
            log_event_with_fields(
                Event::MappingApplied,
                &[("model", self.name.as_str()), ("mapping", provenance.label())],
            );
        }
        let fields_set = values.len().to_string();
        log_event_with_fields(
            Event::InstanceConstructed,
            &[("model", self.name.as_str()), ("fields_set", fields_set.as_str())],
        );

        Ok(Instance::from_parts(
            self.clone(),
            values,
            Metadata::new(&self.name, provenance),
        ))
    }

    /// Builds an instance reading every field under its own name.
    pub fn from_data(&self, raw: &Value) -> ModelResult<Instance> {
        self.construct(Some(raw), ConstructOptions::default())
    }

    /// Builds an instance through a named or ad hoc mapping.
    pub fn from_data_with(
        &self,
        raw: &Value,
        mapping: impl Into<MappingSelector>,
    ) -> ModelResult<Instance> {
        self.construct(Some(raw), ConstructOptions::with_mapping(mapping))
    }

    /// Builds an instance of this type from another instance's serialized
    /// fields. Fields this type does not declare are dropped.
    pub fn from_instance(&self, other: &Instance) -> ModelResult<Instance> {
        self.from_data(&other.serialize())
    }
}
