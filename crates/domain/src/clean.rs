//! Request body cleaning.

use serde::Serialize;
use serde_json::{Map, Value};

/// Serializes an entity and strips fields that must not reach the server.
///
/// Dropped: `null` fields, and nested records whose `id` is a placeholder
/// (`""` or `-1`) left behind by an unselected reference picker.
///
/// # Errors
///
/// Returns the serialization error if `entity` cannot be represented as JSON.
pub fn clean_entity<T: Serialize>(entity: &T) -> Result<Value, serde_json::Error> {
    Ok(clean_value(serde_json::to_value(entity)?))
}

/// Applies the cleaning rules of [`clean_entity`] to an already serialized value.
#[must_use]
pub fn clean_value(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, field)| keep_field(field))
                .collect::<Map<_, _>>(),
        ),
        other => other,
    }
}

fn keep_field(field: &Value) -> bool {
    match field {
        Value::Null => false,
        Value::Object(nested) => !nested.get("id").is_some_and(is_placeholder_id),
        _ => true,
    }
}

fn is_placeholder_id(id: &Value) -> bool {
    match id {
        Value::String(s) => s.is_empty() || s == "-1",
        Value::Number(n) => n.as_i64() == Some(-1),
        _ => false,
    }
}
