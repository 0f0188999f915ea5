//! Schema-aware serialization
//!
//! Output holds exactly the declared fields that are set, under their declared
//! names, in schema order. Unset fields are omitted rather than written as
//! `null`. Nested objects with declared properties follow the same rule.
//! Instance metadata is never emitted.

use serde_json::{Map, Value};

use crate::model::Instance;
use crate::schema::Schema;

/// Plain structured form of an instance.
pub fn to_value(instance: &Instance) -> Value {
    Value::Object(serialize_fields(instance.schema(), instance.values()))
}

/// Filters a field-value map down to what `schema` declares.
pub fn serialize_fields(schema: &Schema, values: &Map<String, Value>) -> Map<String, Value> {
    let mut output = Map::new();
    for (name, def) in schema.iter() {
        let Some(value) = values.get(name) else {
            continue;
        };
        let emitted = match (def.properties(), value) {
            (Some(properties), Value::Object(sub)) => {
                Value::Object(serialize_fields(properties, sub))
            }
            _ => value.clone(),
        };
        output.insert(name.to_string(), emitted);
    }
    output
}
