//! schemata - declarative, schema-driven records
//!
//! A model type is an ordered schema of field descriptors plus named mappings.
//! Instances are sealed to their schema, are populated from raw JSON through
//! fallback-chain mappings, validate on demand and serialize to plain JSON.
//!
//! ```
//! use schemata::model::ModelType;
//! use schemata::schema::{FieldDef, Schema};
//! use serde_json::json;
//!
//! let person = ModelType::define(
//!     "Person",
//!     Schema::new()
//!         .with_field("givenName", FieldDef::required_string())
//!         .with_field("familyName", FieldDef::required_string()),
//! );
//!
//! let amanda = person.from_data(&json!({ "givenName": "Amanda" })).unwrap();
//! assert_eq!(amanda.validate().len(), 1);
//! assert_eq!(amanda.serialize(), json!({ "givenName": "Amanda" }));
//! ```

pub mod cli;
pub mod mapping;
pub mod model;
pub mod observability;
pub mod schema;
pub mod serializer;
pub mod validation;

pub use mapping::{MappingSelector, MappingSpec};
pub use model::{ConstructOptions, Instance, ModelError, ModelRegistry, ModelType};
pub use schema::{FieldDef, FieldType, Schema};
pub use validation::{ValidationError, Validator};
