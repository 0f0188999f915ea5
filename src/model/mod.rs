//! Model subsystem
//!
//! Model types, sealed instances and the declaration registry.
//!
//! # Design Principles
//!
//! - A type is a data value: schema plus named mappings
//! - All instance behaviour is parameterized by the schema alone
//! - Structural misuse fails fast; validity is reported on demand

mod errors;
mod instance;
mod model_type;
mod registry;

pub use errors::{ModelError, ModelResult};
pub use instance::{Instance, MappingProvenance, Metadata};
pub use model_type::{ConstructOptions, ModelType, ROOT_MODEL};
pub use registry::{ModelDecl, ModelRegistry};
