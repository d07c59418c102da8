//! Layering of flattened profile maps.

use std::collections::HashSet;

use super::FlatMap;

/// Returns the non-indexed root of a flattened key.
///
/// That is the part before the first `[`, or the whole key when it has no
/// index: `servers[1].host` → `servers`, `db.port` → `db.port`.
#[must_use]
pub fn list_root(key: &str) -> &str {
    key.find('[').map_or(key, |pos| &key[..pos])
}

/// Merges `layer` on top of `acc`.
///
/// For every key in `layer`, every key of `acc` belonging to the same
/// non-indexed root (the root itself, or the root continued by `.` or `[`)
/// is removed first; then all of `layer` is inserted. Lists are therefore
/// replaced wholesale instead of being merged index by index.
///
/// # Example
///
/// ```
/// use dynconf::document::{FlatMap, overlay};
///
/// let mut acc = FlatMap::from([
///     ("items[0]".to_string(), "a".to_string()),
///     ("items[1]".to_string(), "b".to_string()),
/// ]);
/// overlay(&mut acc, FlatMap::from([("items[0]".to_string(), "c".to_string())]));
///
/// assert_eq!(acc.len(), 1);
/// assert_eq!(acc["items[0]"], "c");
/// ```
pub fn overlay(acc: &mut FlatMap, layer: FlatMap) {
    {
        let roots: HashSet<&str> = layer.keys().map(|k| list_root(k)).collect();
        acc.retain(|key, _| !belongs_to_any(key, &roots));
    }
    acc.extend(layer);
}

/// True if `key`, or any prefix of it ending at a `.` or `[` boundary, is a root.
fn belongs_to_any(key: &str, roots: &HashSet<&str>) -> bool {
    if roots.contains(key) {
        return true;
    }
    key.char_indices()
        .filter(|&(_, c)| c == '.' || c == '[')
        .any(|(pos, _)| roots.contains(&key[..pos]))
}
