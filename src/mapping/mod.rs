//! Mapping subsystem
//!
//! Translates arbitrarily named source data (directory entries, form posts,
//! foreign records) into values keyed by schema field names.

mod errors;
mod resolver;
mod spec;

pub use errors::{MappingError, MappingResult};
pub use resolver::resolve;
pub use spec::{MappingSelector, MappingSpec, SourceKey};

pub(crate) use resolver::json_type_name;
pub(crate) use spec::make_path;
