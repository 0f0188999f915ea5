//! Structural derivation: `exclude` and `subset`
//!
//! Both are pure functions from schema to schema. Every name must be declared
//! in the input schema; the check happens before anything is removed so a
//! failed derivation never yields a partial result.

use super::errors::{DeriveOp, SchemaError, SchemaResult};
use super::types::Schema;

fn check_declared(schema: &Schema, op: DeriveOp, names: &[&str]) -> SchemaResult<()> {
    match names.iter().find(|name| !schema.contains(name)) {
        Some(missing) => Err(SchemaError::unknown_field(op, *missing)),
        None => Ok(()),
    }
}

impl Schema {
    /// Returns a copy of this schema without the named fields.
    pub fn exclude(&self, names: &[&str]) -> SchemaResult<Schema> {
        check_declared(self, DeriveOp::Exclude, names)?;
        let mut derived = self.clone();
        derived.retain(|name| !names.contains(&name));
        Ok(derived)
    }

    /// Returns a copy of this schema keeping only the named fields, with their
    /// original descriptors and in their original declaration order.
    pub fn subset(&self, names: &[&str]) -> SchemaResult<Schema> {
        check_declared(self, DeriveOp::Subset, names)?;
        let mut derived = self.clone();
        derived.retain(|name| names.contains(&name));
        Ok(derived)
    }
}
