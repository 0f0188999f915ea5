//! Schema subsystem
//!
//! Field descriptors, ordered schemas, schema merging across derivation chains
//! and the `exclude`/`subset` structural operators.
//!
//! # Design Principles
//!
//! - Schemas are immutable values once resolved
//! - Resolution is deterministic
//! - Declaration order is preserved through merge and derivation

mod derive;
mod errors;
mod resolver;
mod types;

pub use errors::{DeriveOp, SchemaError, SchemaResult};
pub use resolver::{merge, resolve, Restriction};
pub use types::{FieldDef, FieldType, Schema};
