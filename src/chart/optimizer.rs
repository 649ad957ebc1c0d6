//! Category map → compact client shape.
//!
//! Per category: aspect entries lose a fixed set of internal keys; every
//! other category made of item-name → item-fields mappings is rewritten as a
//! shared `keys` list plus one positional row array per item. Along the way
//! three-letter sign codes are expanded to full names. Categories whose
//! first item is empty or not a mapping pass through untouched.

use serde_json::{json, Map, Value};

use crate::models::Sign;

/// Internal aspect fields never sent to clients.
const ASPECT_EXCLUDED_KEYS: [&str; 6] = ["p1_abs_pos", "p2_abs_pos", "aid", "diff", "p1", "p2"];

/// Presentation and internal item fields dropped from row output.
const ROW_EXCLUDED_KEYS: [&str; 4] = ["emoji", "sign_num", "house", "point_type"];

const ASPECTS_CATEGORY: &str = "aspects";
const KEYS_ENTRY: &str = "keys";
const SIGN_KEY: &str = "sign";

/// Compact a serialized chart. Top-level scalars and lists other than
/// `aspects` pass through unchanged.
pub fn optimize(chart: Value) -> Value {
    let categories = match chart {
        Value::Object(categories) => categories,
        other => return other,
    };

    let mut optimized = Map::new();
    for (category, value) in categories {
        let value = match (category.as_str(), value) {
            (ASPECTS_CATEGORY, Value::Array(entries)) => {
                Value::Array(entries.into_iter().map(filter_aspect).collect())
            }
            (_, Value::Object(items)) => compact_category(items),
            (_, value) => value,
        };
        optimized.insert(category, value);
    }
    Value::Object(optimized)
}

/// Strip the internal keys from one aspect entry.
fn filter_aspect(entry: Value) -> Value {
    match entry {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(key, _)| !ASPECT_EXCLUDED_KEYS.contains(&key.as_str()))
                .collect(),
        ),
        other => other,
    }
}

/// Rewrite an item-name → item-fields mapping as a shared key list plus one
/// row array per item. The key list comes from the first item; a key absent
/// from a later item yields `null` at its position.
fn compact_category(items: Map<String, Value>) -> Value {
    let keys: Vec<String> = match items.values().next() {
        Some(Value::Object(fields)) if !fields.is_empty() => fields
            .keys()
            .filter(|key| !ROW_EXCLUDED_KEYS.contains(&key.as_str()))
            .cloned()
            .collect(),
        _ => return Value::Object(items),
    };

    let mut compacted = Map::new();
    compacted.insert(KEYS_ENTRY.to_string(), json!(keys));
    for (name, item) in items {
        let mut fields = match item {
            Value::Object(fields) => fields,
            other => {
                compacted.insert(name, other);
                continue;
            }
        };
        let row: Vec<Value> = keys
            .iter()
            .map(|key| match fields.remove(key) {
                Some(value) if key == SIGN_KEY => expand_sign(value),
                Some(value) => value,
                None => Value::Null,
            })
            .collect();
        compacted.insert(name, Value::Array(row));
    }
    Value::Object(compacted)
}

/// "Ari" → "Aries"; anything unrecognized passes through unchanged.
fn expand_sign(value: Value) -> Value {
    match value {
        Value::String(code) => match Sign::from_abbreviation(&code) {
            Some(sign) => Value::String(sign.name().to_string()),
            None => Value::String(code),
        },
        other => other,
    }
}
