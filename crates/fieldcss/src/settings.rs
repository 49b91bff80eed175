//! Settings trees and their canonical form.

use serde_json::{Map, Value};

/// Raw field values supplied by the caller, keyed by field key.
pub type SettingsTree = Map<String, Value>;

/// Serializes a value as compact JSON with object keys sorted at every
/// level, so that equal settings always produce the same text regardless of
/// the order they were built in.
///
/// ```rust
/// use fieldcss::settings::canonicalize;
/// use serde_json::json;
///
/// let a = json!({"b": 1, "a": {"y": true, "x": null}});
/// assert_eq!(canonicalize(&a), r#"{"a":{"x":null,"y":true},"b":1}"#);
/// ```
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

/// [`canonicalize`] for a whole settings tree.
pub fn canonicalize_tree(settings: &SettingsTree) -> String {
    let mut out = String::new();
    write_object(settings, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        // Scalars have a single compact rendering.
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut String) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(value, out);
    }
    out.push('}');
}
