//! # Canonical JSON Output
//!
//! Registry files live in version control, so the same registry must always
//! serialize to the same bytes. The canonical form used here is:
//!
//! 1. **Object Keys**: sorted by code point at every nesting level
//! 2. **Indentation**: a fixed number of spaces per level, chosen per file
//! 3. **Separators**: `": "` between key and value, one member per line
//! 4. **Arrays**: elements in original order
//! 5. **No trailing newline**
//!
//! Key order is enforced here rather than left to `serde_json::Map`, so the
//! output stays sorted even if `preserve_order` gets enabled elsewhere in the
//! dependency graph.
//!
//! ## Example
//!
//! ```rust
//! use layerdocs_registry::canonicalize::to_canonical_json;
//! use serde_json::json;
//!
//! let value = json!({"b": 1, "a": {"z": true, "c": null}});
//! let text = to_canonical_json(&value, 2).unwrap();
//! assert_eq!(text, "{\n  \"a\": {\n    \"c\": null,\n    \"z\": true\n  },\n  \"b\": 1\n}");
//! ```

use crate::models::{RegistryError, Result};
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// Serializes `value` in canonical pretty form with `indent` spaces per level.
///
/// # Errors
///
/// Returns `RegistryError::Serialization` if `value` cannot be represented
/// as JSON (for example a map with non-string keys).
pub fn to_canonical_json<T: Serialize>(value: &T, indent: usize) -> Result<String> {
    let value = sort_keys(serde_json::to_value(value)?);

    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;

    String::from_utf8(out).map_err(|e| RegistryError::Serialization(serde_json::Error::custom(e)))
}

/// Rebuilds every object in `value` with its members in sorted key order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_four_space_indent() {
        let text = to_canonical_json(&json!({"k": {"n": 1}}), 4).unwrap();
        assert_eq!(text, "{\n    \"k\": {\n        \"n\": 1\n    }\n}");
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(to_canonical_json(&json!({}), 4).unwrap(), "{}");
    }

    #[test]
    fn test_output_independent_of_insertion_order() {
        let a = json!({"zebra": 1, "alpha": {"y": 2, "b": 3}});
        let b = json!({"alpha": {"b": 3, "y": 2}, "zebra": 1});
        assert_eq!(
            to_canonical_json(&a, 2).unwrap(),
            to_canonical_json(&b, 2).unwrap()
        );
    }

    #[test]
    fn test_arrays_keep_order() {
        let text = to_canonical_json(&json!({"a": [3, 1, 2]}), 2).unwrap();
        assert_eq!(text, "{\n  \"a\": [\n    3,\n    1,\n    2\n  ]\n}");
    }
}
