//! Named output schemas for structured gateway calls.

use derive_getters::Getters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A fixed, named JSON schema a structured gateway call must satisfy.
///
/// Schemas are derived once from a Rust type and normalised for strict
/// structured-output mode: every object closes `additionalProperties`,
/// lists all of its properties as required, and carries no annotation
/// keywords (`$schema`, `title`, `format`).
///
/// # Examples
///
/// ```
/// use manimate_core::{GeneratedScript, OutputSchema};
///
/// let schema = OutputSchema::of::<GeneratedScript>("generated_script");
/// assert_eq!(schema.name(), "generated_script");
/// assert_eq!(schema.schema()["additionalProperties"], false);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct OutputSchema {
    /// Schema identifier sent to the gateway
    name: String,
    /// Strict JSON schema document
    schema: JsonValue,
}

impl OutputSchema {
    /// Derive a strict schema from `T`.
    pub fn of<T: JsonSchema>(name: impl Into<String>) -> Self {
        let root = schemars::schema_for!(T);
        let mut schema = serde_json::to_value(root).unwrap_or(JsonValue::Null);
        if let JsonValue::Object(map) = &mut schema {
            map.remove("$schema");
        }
        strictify(&mut schema);
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Wrap an already-strict schema document.
    pub fn from_value(name: impl Into<String>, schema: JsonValue) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

fn strictify(value: &mut JsonValue) {
    match value {
        JsonValue::Object(map) => {
            map.remove("title");
            map.remove("format");
            if let Some(JsonValue::Object(properties)) = map.get("properties") {
                let required: Vec<JsonValue> = properties
                    .keys()
                    .map(|key| JsonValue::String(key.clone()))
                    .collect();
                map.insert("required".to_string(), JsonValue::Array(required));
                map.insert("additionalProperties".to_string(), JsonValue::Bool(false));
            }
            for (key, child) in map.iter_mut() {
                if key == "properties" || key == "definitions" || key == "$defs" {
                    strictify_members(child);
                } else {
                    strictify(child);
                }
            }
        }
        JsonValue::Array(items) => items.iter_mut().for_each(strictify),
        _ => {}
    }
}

// Property maps are keyed by field name, so a field literally called
// "title" or "format" must survive.
fn strictify_members(value: &mut JsonValue) {
    if let JsonValue::Object(members) = value {
        let members: &mut Map<String, JsonValue> = members;
        members.values_mut().for_each(strictify);
    }
}
