//! Effective schema computation
//!
//! A type's schema is a pure function of its ancestor's resolved schema and the
//! type's own delta. Nothing here mutates an input; resolving the same inputs
//! twice yields equal schemas, so results may be cached per type.

use super::errors::SchemaResult;
use super::types::Schema;

/// Structural restriction applied to the ancestor schema before merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restriction {
    /// Fields removed from the ancestor schema
    pub exclude: Vec<String>,
    /// If present, only these ancestor fields are kept
    pub subset: Option<Vec<String>>,
}

impl Restriction {
    pub fn is_empty(&self) -> bool {
        self.exclude.is_empty() && self.subset.is_none()
    }

    /// Applies `exclude`, then `subset`.
    pub fn apply(&self, schema: &Schema) -> SchemaResult<Schema> {
        let mut restricted = schema.clone();
        if !self.exclude.is_empty() {
            let names: Vec<&str> = self.exclude.iter().map(String::as_str).collect();
            restricted = restricted.exclude(&names)?;
        }
        if let Some(subset) = &self.subset {
            let names: Vec<&str> = subset.iter().map(String::as_str).collect();
            restricted = restricted.subset(&names)?;
        }
        Ok(restricted)
    }
}

/// Merges a type's own declarations into its ancestor's schema.
///
/// Ancestor fields come first in their original order; the delta's new fields
/// follow in declaration order. On a name collision the delta's descriptor wins
/// and the field keeps the ancestor's position.
pub fn merge(ancestor: &Schema, delta: &Schema) -> Schema {
    let mut merged = ancestor.clone();
    for (name, def) in delta.iter() {
        merged.insert(name, def.clone());
    }
    merged
}

/// Resolves the effective schema for a declaration.
///
/// With no ancestor the result is exactly the declared set.
pub fn resolve(
    ancestor: Option<&Schema>,
    restriction: &Restriction,
    own: &Schema,
) -> SchemaResult<Schema> {
    match ancestor {
        Some(parent) => Ok(merge(&restriction.apply(parent)?, own)),
        None => Ok(own.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, FieldType, SchemaError};

    fn person() -> Schema {
        Schema::new()
            .with_field("givenName", FieldDef::required_string())
            .with_field("middleName", FieldDef::optional_string())
            .with_field("familyName", FieldDef::required_string())
            .with_field("email", FieldDef::optional_string().with_format("email"))
    }

    fn worker_delta() -> Schema {
        Schema::new()
            .with_field("position", FieldDef::required_string())
            .with_field("company", FieldDef::required_string())
    }

    #[test]
    fn test_root_resolves_to_declared_set() {
        let own = person();
        assert_eq!(resolve(None, &Restriction::default(), &own).unwrap(), own);
        assert!(resolve(None, &Restriction::default(), &Schema::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_extension_appends_in_order() {
        let worker = resolve(Some(&person()), &Restriction::default(), &worker_delta()).unwrap();
        assert_eq!(
            worker.names().collect::<Vec<_>>(),
            ["givenName", "middleName", "familyName", "email", "position", "company"]
        );
    }

    #[test]
    fn test_more_derived_declaration_wins() {
        let delta = Schema::new().with_field("email", FieldDef::required_string());
        let merged = merge(&person(), &delta);
        let email = merged.get("email").unwrap();
        assert!(email.required);
        assert!(email.format.is_none());
        assert_eq!(merged.names().last(), Some("email"));
    }

    #[test]
    fn test_resolution_is_stable() {
        let first = resolve(Some(&person()), &Restriction::default(), &worker_delta()).unwrap();
        let second = resolve(Some(&person()), &Restriction::default(), &worker_delta()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_restriction_then_merge() {
        let restriction = Restriction {
            exclude: vec!["middleName".into()],
            subset: Some(vec!["givenName".into(), "email".into()]),
        };
        let own = Schema::new().with_field("age", FieldDef::new(FieldType::Integer, false));
        let schema = resolve(Some(&person()), &restriction, &own).unwrap();
        assert_eq!(schema.names().collect::<Vec<_>>(), ["givenName", "email", "age"]);
    }

    #[test]
    fn test_restriction_unknown_field() {
        let restriction = Restriction {
            exclude: vec!["nickname".into()],
            subset: None,
        };
        let err = resolve(Some(&person()), &restriction, &Schema::new()).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { .. }));
    }
}
