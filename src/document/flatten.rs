//! Depth-first flattening of decoded documents.

use indexmap::IndexMap;
use serde_json::Value;

/// Flat, insertion-ordered mapping of key paths to string values.
pub type FlatMap = IndexMap<String, String>;

/// Flattens a decoded document into dotted/bracketed key paths.
///
/// - Map entries compose `parent.child`; the root has no prefix.
/// - List elements compose `parent[index]`, zero-based, with no dot
///   before the bracket.
/// - Scalars are stringified; `null` becomes `""`.
///
/// Keys come out in the order a depth-first walk discovers them.
/// A `null` or scalar root yields an empty map, as do empty nested
/// maps and lists.
///
/// # Example
///
/// ```
/// use dynconf::document::flatten;
/// use serde_json::json;
///
/// let flat = flatten(&json!({"db": {"hosts": ["a", "b"], "port": 5432}}));
///
/// assert_eq!(flat["db.hosts[0]"], "a");
/// assert_eq!(flat["db.hosts[1]"], "b");
/// assert_eq!(flat["db.port"], "5432");
/// ```
#[must_use]
pub fn flatten(tree: &Value) -> FlatMap {
    let mut out = FlatMap::new();
    if matches!(tree, Value::Object(_) | Value::Array(_)) {
        flatten_into("", tree, &mut out);
    }
    out
}

fn flatten_into(prefix: &str, value: &Value, out: &mut FlatMap) {
    match value {
        Value::Object(entries) => {
            for (key, child) in entries {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(&path, child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(&format!("{prefix}[{index}]"), child, out);
            }
        }
        scalar => {
            out.insert(prefix.to_string(), scalar_to_string(scalar));
        }
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
