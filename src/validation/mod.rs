//! Validation subsystem
//!
//! Required-ness, type and format checks driven purely by a schema. Primitive
//! type and format decisions are delegated to `TypeChecker` and
//! `FormatChecker` so callers can plug in their own rules.

mod checkers;
mod engine;
mod errors;

pub use checkers::{FormatChecker, JsonTypeChecker, StandardFormats, TypeChecker};
pub use engine::Validator;
pub use errors::ValidationError;
