//! Field descriptors and ordered schemas
//!
//! Supported types:
//! - string: UTF-8 string
//! - number: any JSON number
//! - integer: integral JSON number
//! - boolean: true/false
//! - object: nested object with its own (optional) property schema
//! - array: array with an optional element type
//! - any: free-form value

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Primitive type tag of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// Integer or floating point number
    Number,
    /// Integral number
    Integer,
    /// Boolean
    Boolean,
    /// Nested object. Empty `properties` means free-form.
    Object {
        /// Nested field definitions
        #[serde(default, skip_serializing_if = "Schema::is_empty")]
        properties: Schema,
    },
    /// Array, optionally typed per element
    Array {
        /// Element type (boxed to allow recursive types)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Box<FieldType>>,
    },
    /// Any value
    Any,
}

impl FieldType {
    /// Returns the type tag used in schemas and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
            FieldType::Any => "any",
        }
    }

    /// Nested property schema, if this is an object type with declared properties.
    pub fn properties(&self) -> Option<&Schema> {
        match self {
            FieldType::Object { properties } if !properties.is_empty() => Some(properties),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single schema entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the field must hold a value for the record to validate
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Semantic refinement checked by the format checker (e.g. "email")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldDef {
    /// Create a field of the given type
    pub fn new(field_type: FieldType, required: bool) -> Self {
        Self {
            field_type,
            required,
            format: None,
        }
    }

    pub fn required_string() -> Self {
        Self::new(FieldType::String, true)
    }

    pub fn optional_string() -> Self {
        Self::new(FieldType::String, false)
    }

    pub fn required_number() -> Self {
        Self::new(FieldType::Number, true)
    }

    pub fn optional_number() -> Self {
        Self::new(FieldType::Number, false)
    }

    pub fn optional_integer() -> Self {
        Self::new(FieldType::Integer, false)
    }

    pub fn optional_boolean() -> Self {
        Self::new(FieldType::Boolean, false)
    }

    /// Create a required object field
    pub fn required_object(properties: Schema) -> Self {
        Self::new(FieldType::Object { properties }, true)
    }

    /// Create an optional object field
    pub fn optional_object(properties: Schema) -> Self {
        Self::new(FieldType::Object { properties }, false)
    }

    /// Create an optional array field
    pub fn optional_array(items: Option<FieldType>) -> Self {
        Self::new(
            FieldType::Array {
                items: items.map(Box::new),
            },
            false,
        )
    }

    /// Attach a format tag
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Nested property schema of an object field
    pub fn properties(&self) -> Option<&Schema> {
        self.field_type.properties()
    }
}

/// Ordered mapping from field name to descriptor.
///
/// Declaration order is preserved: validation walks fields in this order and
/// serialized records list them in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, FieldDef)>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.insert(name, def);
        self
    }

    /// Inserts a field. An existing name keeps its position and takes the new
    /// descriptor. Returns the replaced descriptor, if any.
    pub fn insert(&mut self, name: impl Into<String>, def: FieldDef) -> Option<FieldDef> {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, def)),
            None => {
                self.fields.push((name, def));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a dotted path (`address.postalCode`) through nested object properties.
    pub fn lookup_path(&self, path: &str) -> Option<&FieldDef> {
        let mut segments = path.split('.');
        let mut def = self.get(segments.next()?)?;
        for segment in segments {
            def = def.properties()?.get(segment)?;
        }
        Some(def)
    }

    pub(crate) fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.fields.retain(|(n, _)| keep(n.as_str()));
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, def) in &self.fields {
            map.serialize_entry(name, def)?;
        }
        map.end()
    }
}

struct SchemaVisitor;

impl<'de> Visitor<'de> for SchemaVisitor {
    type Value = Schema;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to field definitions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Schema, A::Error> {
        let mut schema = Schema::new();
        while let Some((name, def)) = access.next_entry::<String, FieldDef>()? {
            schema.insert(name, def);
        }
        Ok(schema)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Schema, D::Error> {
        deserializer.deserialize_map(SchemaVisitor)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a str, &'a FieldDef);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a FieldDef)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
