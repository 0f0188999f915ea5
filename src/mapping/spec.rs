//! Mapping specifications
//!
//! A mapping spec selects how externally named data reaches declared fields:
//!
//! ```json
//! {
//!   "familyName": "sn || surname",
//!   "givenName": ["givenName", "cn"],
//!   "address": { "city": "l", "postalCode": "postalCode" }
//! }
//! ```
//!
//! Strings are fallback chains separated by `||`, arrays are explicit chains,
//! and objects are nested specs for object-typed fields.

use std::collections::BTreeMap;
use std::convert::TryFrom;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::errors::{MappingError, MappingResult};
use crate::schema::Schema;

const CHAIN_SEPARATOR: &str = "||";

/// Where a single field's value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSourceKey")]
pub enum SourceKey {
    /// Candidate keys, tried in order; the first key present wins
    Chain(Vec<String>),
    /// Sub-mapping for an object-typed field, resolved against the same raw data
    Nested(MappingSpec),
}

impl SourceKey {
    /// Parses a `a || b || c` expression.
    pub fn parse(expression: &str) -> MappingResult<Self> {
        Self::chain(expression.split(CHAIN_SEPARATOR).map(str::to_string))
            .map_err(|_| MappingError::InvalidExpression {
                expression: expression.to_string(),
            })
    }

    /// Builds a chain from explicit candidates.
    pub fn chain<I, S>(candidates: I) -> MappingResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys = Vec::new();
        for candidate in candidates {
            let key = candidate.as_ref().trim();
            if key.is_empty() {
                return Err(MappingError::InvalidExpression {
                    expression: candidate.as_ref().to_string(),
                });
            }
            keys.push(key.to_string());
        }
        if keys.is_empty() {
            return Err(MappingError::InvalidExpression {
                expression: String::new(),
            });
        }
        Ok(SourceKey::Chain(keys))
    }

    /// Candidate keys of a chain, empty for nested specs
    pub fn candidates(&self) -> &[String] {
        match self {
            SourceKey::Chain(keys) => keys,
            SourceKey::Nested(_) => &[],
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSourceKey {
    Expression(String),
    Candidates(Vec<String>),
    Nested(MappingSpec),
}

impl TryFrom<RawSourceKey> for SourceKey {
    type Error = MappingError;

    fn try_from(raw: RawSourceKey) -> MappingResult<Self> {
        match raw {
            RawSourceKey::Expression(expression) => SourceKey::parse(&expression),
            RawSourceKey::Candidates(candidates) => SourceKey::chain(candidates),
            RawSourceKey::Nested(spec) => Ok(SourceKey::Nested(spec)),
        }
    }
}

impl Serialize for SourceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SourceKey::Chain(keys) => {
                let separator = format!(" {} ", CHAIN_SEPARATOR);
                serializer.serialize_str(&keys.join(separator.as_str()))
            }
            SourceKey::Nested(spec) => spec.serialize(serializer),
        }
    }
}

/// Table from schema field name to source key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MappingSpec {
    entries: BTreeMap<String, SourceKey>,
}

impl MappingSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style entry from a `a || b` expression
    pub fn with(mut self, field: impl Into<String>, expression: &str) -> MappingResult<Self> {
        self.entries.insert(field.into(), SourceKey::parse(expression)?);
        Ok(self)
    }

    /// Builder-style nested entry
    pub fn with_nested(mut self, field: impl Into<String>, nested: MappingSpec) -> Self {
        self.entries.insert(field.into(), SourceKey::Nested(nested));
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, key: SourceKey) -> Option<SourceKey> {
        self.entries.insert(field.into(), key)
    }

    pub fn get(&self, field: &str) -> Option<&SourceKey> {
        self.entries.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceKey)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ensures every entry targets a declared field. Nested entries are checked
    /// against the field's declared properties.
    pub fn check_targets(&self, schema: &Schema) -> MappingResult<()> {
        self.check_targets_at(schema, "")
    }

    fn check_targets_at(&self, schema: &Schema, prefix: &str) -> MappingResult<()> {
        for (field, key) in &self.entries {
            let path = make_path(prefix, field);
            let def = schema
                .get(field)
                .ok_or_else(|| MappingError::unknown_target(&path))?;
            if let SourceKey::Nested(nested) = key {
                match def.properties() {
                    Some(properties) => nested.check_targets_at(properties, &path)?,
                    None => {
                        // Nested spec on a field without declared properties
                        if let Some((sub, _)) = nested.iter().next() {
                            return Err(MappingError::unknown_target(make_path(&path, sub)));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Copy of this spec restricted to entries whose target field is declared.
    pub fn pruned_to(&self, schema: &Schema) -> MappingSpec {
        MappingSpec {
            entries: self
                .entries
                .iter()
                .filter(|(field, _)| schema.contains(field))
                .map(|(field, key)| (field.clone(), key.clone()))
                .collect(),
        }
    }
}

impl Serialize for MappingSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, key) in &self.entries {
            map.serialize_entry(field, key)?;
        }
        map.end()
    }
}

/// Which mapping to apply at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingSelector {
    /// A mapping declared on the model type
    Named(String),
    /// A one-off mapping supplied by the caller
    AdHoc(MappingSpec),
}

impl From<&str> for MappingSelector {
    fn from(name: &str) -> Self {
        MappingSelector::Named(name.to_string())
    }
}

impl From<MappingSpec> for MappingSelector {
    fn from(spec: MappingSpec) -> Self {
        MappingSelector::AdHoc(spec)
    }
}

pub(crate) fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
