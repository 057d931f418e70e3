//! Value envelope encoding.
//!
//! Storage backends only hold text. Scalars are stored as their plain text
//! form; objects and arrays are serialized as JSON with a tag field so a
//! read can tell a stored object apart from a stored string that merely
//! looks like JSON.
//!
//! ```text
//! "blue"                 -> blue
//! 15                     -> 15
//! {"make": "Honda"}      -> {"isObjectEnvelope":true,"make":"Honda"}
//! [1, 2]                 -> {"isArrayEnvelope":true,"items":[1,2]}
//! ```
//!
//! Untagged text that parses as JSON decodes to the parsed value, so the
//! string `"3"` comes back as the number `3`. Callers that need exact
//! strings must not store number- or JSON-shaped text.

use serde_json::{Map, Value};

/// Tag field marking an encoded object.
pub const OBJECT_TAG: &str = "isObjectEnvelope";

/// Tag field marking an encoded array.
pub const ARRAY_TAG: &str = "isArrayEnvelope";

/// Field holding the elements of an encoded array.
pub const ARRAY_ITEMS: &str = "items";

// Tags written by earlier releases of the browser plugin.
const LEGACY_OBJECT_TAG: &str = "isJsonObj";
const LEGACY_ARRAY_TAG: &str = "isJsonArr";
const LEGACY_ARRAY_ITEMS: &str = "arr";

/// Encode a value for text storage.
///
/// Returns `None` for `Value::Null`, which callers treat as "delete the
/// entry" rather than storing anything.
pub fn encode(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let mut envelope = Map::new();
            envelope.insert(ARRAY_TAG.to_string(), Value::Bool(true));
            envelope.insert(ARRAY_ITEMS.to_string(), Value::Array(items.clone()));
            Some(Value::Object(envelope).to_string())
        }
        Value::Object(fields) => {
            let mut envelope = fields.clone();
            envelope.insert(OBJECT_TAG.to_string(), Value::Bool(true));
            Some(Value::Object(envelope).to_string())
        }
    }
}

/// Decode stored text back into a value.
///
/// Never fails: text that does not parse as JSON is a plain string.
pub fn decode(raw: &str) -> Value {
    let parsed = match serde_json::from_str::<Value>(raw) {
        Ok(parsed) => parsed,
        Err(_) => return Value::String(raw.to_string()),
    };

    match parsed {
        // A stored entry is never null; "null" was stored as text.
        Value::Null => Value::String(raw.to_string()),
        Value::Object(fields) => unwrap_envelope(fields),
        other => other,
    }
}

fn unwrap_envelope(mut fields: Map<String, Value>) -> Value {
    for tag in [OBJECT_TAG, LEGACY_OBJECT_TAG] {
        if has_tag(&fields, tag) {
            fields.remove(tag);
            return Value::Object(fields);
        }
    }

    for (tag, items_field) in [
        (ARRAY_TAG, ARRAY_ITEMS),
        (LEGACY_ARRAY_TAG, LEGACY_ARRAY_ITEMS),
    ] {
        if has_tag(&fields, tag) {
            if let Some(items) = fields.remove(items_field) {
                return items;
            }
        }
    }

    Value::Object(fields)
}

fn has_tag(fields: &Map<String, Value>, tag: &str) -> bool {
    fields.get(tag).is_some_and(is_truthy)
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
