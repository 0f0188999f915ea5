//! Mapping resolution
//!
//! Turns raw, externally named input into a map keyed by schema field names.
//!
//! Resolution semantics:
//! - Without a spec every field is read under its own name
//! - Unknown input keys are ignored
//! - A fallback chain picks the first candidate *key present* in the input,
//!   even when its value is falsy (`""`, `0`, `false`, `null`)
//! - No present candidate leaves the field unset; required-ness is a
//!   validation concern
//! - Nested specs resolve against the same (flat) input, not a sub-object
//! - Fields without a spec entry fall back to identity mapping
//! - Object values for fields with declared properties keep only those
//!   properties, whichever way they were read

use serde_json::{Map, Value};

use super::errors::{MappingError, MappingResult};
use super::spec::{MappingSpec, SourceKey};
use crate::schema::{FieldDef, Schema};

/// Resolves raw input into schema-keyed field values.
///
/// # Errors
///
/// - `InvalidSource` if `raw` is not an object
/// - `UnknownTarget` if `spec` names a field the schema does not declare
pub fn resolve(
    schema: &Schema,
    raw: &Value,
    spec: Option<&MappingSpec>,
) -> MappingResult<Map<String, Value>> {
    let source = raw.as_object().ok_or_else(|| MappingError::InvalidSource {
        actual: json_type_name(raw).to_string(),
    })?;

    if let Some(spec) = spec {
        spec.check_targets(schema)?;
    }

    Ok(resolve_object(schema, source, spec))
}

fn resolve_object(
    schema: &Schema,
    source: &Map<String, Value>,
    spec: Option<&MappingSpec>,
) -> Map<String, Value> {
    let mut resolved = Map::new();

    for (name, def) in schema.iter() {
        let value = match spec.and_then(|s| s.get(name)) {
            Some(SourceKey::Chain(candidates)) => {
                first_present(source, candidates).map(|value| narrow(def, value))
            }
            Some(SourceKey::Nested(nested)) => def.properties().and_then(|properties| {
                let sub = resolve_object(properties, source, Some(nested));
                (!sub.is_empty()).then(|| Value::Object(sub))
            }),
            None => source.get(name).map(|value| narrow(def, value)),
        };

        if let Some(value) = value {
            resolved.insert(name.to_string(), value);
        }
    }

    resolved
}

/// First candidate whose key exists in the source.
fn first_present<'a>(source: &'a Map<String, Value>, candidates: &[String]) -> Option<&'a Value> {
    candidates.iter().find_map(|key| source.get(key))
}

/// Object values with declared properties are narrowed to those properties;
/// anything else is carried as-is so validation can report it.
fn narrow(def: &FieldDef, value: &Value) -> Value {
    match (def.properties(), value) {
        (Some(properties), Value::Object(sub)) => {
            Value::Object(resolve_object(properties, sub, None))
        }
        _ => value.clone(),
    }
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person() -> Schema {
        Schema::new()
            .with_field("givenName", FieldDef::required_string())
            .with_field("familyName", FieldDef::required_string())
            .with_field("email", FieldDef::optional_string().with_format("email"))
    }

    fn ldap() -> MappingSpec {
        MappingSpec::new()
            .with("givenName", "givenName || cn")
            .unwrap()
            .with("familyName", "sn || surname")
            .unwrap()
            .with("email", "mail")
            .unwrap()
    }

    fn located() -> Schema {
        Schema::new().with_field(
            "address",
            FieldDef::optional_object(
                Schema::new().with_field("city", FieldDef::optional_string()),
            ),
        )
    }

    #[test]
    fn test_identity_ignores_unknown_keys() {
        let resolved = resolve(
            &person(),
            &json!({ "givenName": "Joyce", "familyName": "Ansari", "doesntLike": "cheesecake" }),
            None,
        )
        .unwrap();

        assert_eq!(
            Value::Object(resolved),
            json!({ "givenName": "Joyce", "familyName": "Ansari" })
        );
    }

    #[test]
    fn test_fallback_uses_later_candidate() {
        let resolved = resolve(&person(), &json!({ "surname": "Conway" }), Some(&ldap())).unwrap();
        assert_eq!(resolved["familyName"], "Conway");
    }

    #[test]
    fn test_fallback_prefers_first_candidate() {
        let resolved = resolve(
            &person(),
            &json!({ "sn": "Conway", "surname": "Other" }),
            Some(&ldap()),
        )
        .unwrap();
        assert_eq!(resolved["familyName"], "Conway");
    }

    #[test]
    fn test_present_but_empty_key_wins() {
        let resolved = resolve(
            &person(),
            &json!({ "sn": "", "surname": "Conway" }),
            Some(&ldap()),
        )
        .unwrap();
        assert_eq!(resolved["familyName"], "");
    }

    #[test]
    fn test_no_candidate_leaves_unset() {
        let resolved = resolve(&person(), &json!({ "cn": "Lynn" }), Some(&ldap())).unwrap();
        assert_eq!(resolved["givenName"], "Lynn");
        assert!(!resolved.contains_key("familyName"));
        assert!(!resolved.contains_key("email"));
    }

    #[test]
    fn test_unmapped_field_uses_own_name() {
        let spec = MappingSpec::new().with("familyName", "sn").unwrap();
        let resolved = resolve(
            &person(),
            &json!({ "givenName": "Lynn", "sn": "Conway" }),
            Some(&spec),
        )
        .unwrap();
        assert_eq!(resolved["givenName"], "Lynn");
        assert_eq!(resolved["familyName"], "Conway");
    }

    #[test]
    fn test_nested_mapping_reads_flat_source() {
        let schema = person().with_field(
            "address",
            FieldDef::optional_object(
                Schema::new()
                    .with_field("city", FieldDef::optional_string())
                    .with_field("postalCode", FieldDef::optional_string()),
            ),
        );
        let spec = MappingSpec::new().with_nested(
            "address",
            MappingSpec::new()
                .with("city", "l || city")
                .unwrap()
                .with("postalCode", "postalCode")
                .unwrap(),
        );

        let resolved = resolve(
            &schema,
            &json!({ "givenName": "Lynn", "l": "Pasadena", "postalCode": "91125" }),
            Some(&spec),
        )
        .unwrap();

        assert_eq!(
            resolved["address"],
            json!({ "city": "Pasadena", "postalCode": "91125" })
        );
    }

    #[test]
    fn test_nested_mapping_without_matches_leaves_unset() {
        let schema = located();
        let city = MappingSpec::new().with("city", "l").unwrap();
        let spec = MappingSpec::new().with_nested("address", city);

        let resolved = resolve(&schema, &json!({ "x": 1 }), Some(&spec)).unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_identity_narrows_nested_object() {
        let schema = located();
        let resolved = resolve(
            &schema,
            &json!({ "address": { "city": "Paris", "planet": "Earth" } }),
            None,
        )
        .unwrap();
        assert_eq!(resolved["address"], json!({ "city": "Paris" }));
    }

    #[test]
    fn test_chain_narrows_nested_object() {
        let schema = located();
        let spec = MappingSpec::new().with("address", "addr").unwrap();
        let resolved = resolve(
            &schema,
            &json!({ "addr": { "city": "Paris", "planet": "Earth" } }),
            Some(&spec),
        )
        .unwrap();
        assert_eq!(resolved["address"], json!({ "city": "Paris" }));
    }

    #[test]
    fn test_identity_keeps_mistyped_value() {
        let schema = located();
        let resolved = resolve(&schema, &json!({ "address": "Paris" }), None).unwrap();
        assert_eq!(resolved["address"], "Paris");
    }

    #[test]
    fn test_non_object_source_rejected() {
        let err = resolve(&person(), &json!(["a"]), None).unwrap_err();
        assert_eq!(
            err,
            MappingError::InvalidSource {
                actual: "array".into()
            }
        );
    }

    #[test]
    fn test_spec_targeting_unknown_field_rejected() {
        let spec = MappingSpec::new().with("nickname", "nick").unwrap();
        let err = resolve(&person(), &json!({}), Some(&spec)).unwrap_err();
        assert_eq!(err.code(), "MAPPING_UNKNOWN_TARGET");
    }
}
