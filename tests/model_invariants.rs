//! Model Invariant Tests
//!
//! - Instances are sealed to their schema at every derivation depth
//! - exclude/subset produce exactly the expected field sets
//! - Extension keeps ancestor fields first, in declaration order
//! - Enumeration, equality and serialization never see metadata

use schemata::model::{ModelError, ModelType};
use schemata::schema::{FieldDef, Schema, SchemaError};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn person() -> ModelType {
    ModelType::define(
        "Person",
        Schema::new()
            .with_field("givenName", FieldDef::required_string())
            .with_field("middleName", FieldDef::optional_string())
            .with_field("familyName", FieldDef::required_string())
            .with_field("email", FieldDef::optional_string().with_format("email")),
    )
}

fn worker() -> ModelType {
    person().extend(
        "Worker",
        Schema::new()
            .with_field("position", FieldDef::required_string())
            .with_field("company", FieldDef::required_string()),
    )
}

fn field_names(model: &ModelType) -> Vec<&str> {
    model.schema().names().collect()
}

// =============================================================================
// Sealing Tests
// =============================================================================

/// Writing an undeclared attribute fails and leaves the instance untouched.
#[test]
fn test_undeclared_write_fails() {
    let mut amanda = person().instantiate();
    let err = amanda.set("isBurglar", true).unwrap_err();

    assert_eq!(err, ModelError::undeclared("Person", "isBurglar"));
    assert_eq!(err.code(), "MODEL_UNDECLARED_FIELD");
    assert!(amanda.values().is_empty());
}

/// Sealing holds for extended, excluded and subset types alike.
#[test]
fn test_sealed_at_every_derivation_depth() {
    let offline = worker().exclude(&["email"]).unwrap();
    let names_only = offline.subset(&["givenName", "familyName"]).unwrap();

    for model in [person(), worker(), offline.clone(), names_only.clone()] {
        let mut instance = model.instantiate();
        assert!(instance.set("isBurglar", true).is_err(), "{}", model.name());
        assert!(instance.get("isBurglar").is_err(), "{}", model.name());
    }

    // Fields removed by derivation are undeclared on the derived type
    assert!(offline.instantiate().set("email", "a@b.c").is_err());
    assert!(names_only.instantiate().set("position", "Engineer").is_err());
}

/// Raw data keys the schema does not declare never reach the instance.
#[test]
fn test_construction_ignores_undeclared_keys() {
    let amanda = person()
        .from_data(&json!({ "givenName": "Amanda", "isBurglar": true }))
        .unwrap();

    assert_eq!(amanda.values().len(), 1);
    assert!(!amanda.is_set("isBurglar"));
    assert_eq!(amanda.serialize(), json!({ "givenName": "Amanda" }));
}

// =============================================================================
// Derivation Tests
// =============================================================================

/// Worker holds all Person fields first, then its own, in order.
#[test]
fn test_extension_order() {
    assert_eq!(
        field_names(&worker()),
        ["givenName", "middleName", "familyName", "email", "position", "company"]
    );
    assert_eq!(worker().parent(), Some("Person"));
}

/// An override keeps the ancestor's position but takes the new descriptor.
#[test]
fn test_override_keeps_position() {
    let strict_person = person().extend(
        "StrictPerson",
        Schema::new().with_field("middleName", FieldDef::required_string()),
    );

    assert_eq!(field_names(&strict_person), field_names(&person()));
    assert!(strict_person.schema().get("middleName").unwrap().required);
}

#[test]
fn test_exclude_field_set() {
    let derived = person().exclude(&["email"]).unwrap();
    assert_eq!(field_names(&derived), ["givenName", "middleName", "familyName"]);
    assert_eq!(derived.name(), "Person.exclude(email)");

    // The ancestor is unchanged
    assert_eq!(person().schema().len(), 4);
}

#[test]
fn test_subset_field_set_in_schema_order() {
    let derived = person().subset(&["familyName", "givenName"]).unwrap();
    assert_eq!(field_names(&derived), ["givenName", "familyName"]);
}

#[test]
fn test_derivation_with_unknown_name_fails() {
    let err = person().exclude(&["nickname"]).unwrap_err();
    assert!(matches!(err, ModelError::Schema(SchemaError::UnknownField { .. })));

    let err = person().subset(&["givenName", "nickname"]).unwrap_err();
    assert_eq!(err.code(), "SCHEMA_DERIVATION_UNKNOWN_FIELD");
}

/// Empty exclude is the identity; empty subset keeps nothing.
#[test]
fn test_empty_derivations() {
    assert_eq!(field_names(&person().exclude(&[]).unwrap()), field_names(&person()));
    assert!(person().subset(&[]).unwrap().schema().is_empty());
}

/// A subset instance carries no excluded field after copying from a full one.
#[test]
fn test_from_instance_drops_undeclared_fields() {
    let full = worker()
        .from_data(&json!({
            "givenName": "Amanda",
            "familyName": "Bryson",
            "position": "Engineer",
            "company": "Acme"
        }))
        .unwrap();

    let names_only = worker().subset(&["givenName", "familyName"]).unwrap();
    let copy = names_only.from_instance(&full).unwrap();

    assert_eq!(
        copy.serialize(),
        json!({ "givenName": "Amanda", "familyName": "Bryson" })
    );
}

// =============================================================================
// Metadata Tests
// =============================================================================

#[test]
fn test_metadata_not_enumerated_or_serialized() {
    let amanda = person()
        .from_data(&json!({ "givenName": "Amanda" }))
        .unwrap();

    let names: Vec<&str> = amanda.fields().map(|(name, _)| name).collect();
    assert_eq!(names, ["givenName", "middleName", "familyName", "email"]);

    let serialized = amanda.serialize();
    let keys: Vec<&String> = serialized.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["givenName"]);
    assert_eq!(amanda.metadata().model(), "Person");
}
