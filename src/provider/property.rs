//! A single named configuration entry.

use std::fmt;

use parking_lot::RwLock;

use crate::resolver::MASK;

#[derive(Debug, Clone)]
struct PropertyValues {
    unresolved: String,
    resolved: String,
    sensitive: bool,
    synthetic: bool,
}

/// A named configuration entry holding its raw and resolved values.
///
/// Properties are shared as `Arc<Property>` and updated in place by the
/// provider's reconciliation, so a handle obtained once keeps observing the
/// latest committed value. Values are only mutated while the provider holds
/// its namespace write lock.
///
/// `Debug` and `Display` mask the values of sensitive properties.
pub struct Property {
    name: String,
    values: RwLock<PropertyValues>,
}

impl Property {
    pub(crate) fn new(
        name: impl Into<String>,
        unresolved: impl Into<String>,
        resolved: impl Into<String>,
        sensitive: bool,
    ) -> Self {
        Self {
            name: name.into(),
            values: RwLock::new(PropertyValues {
                unresolved: unresolved.into(),
                resolved: resolved.into(),
                sensitive,
                synthetic: false,
            }),
        }
    }

    /// A property standing in for a default value no source provides.
    pub(crate) fn synthetic(name: impl Into<String>, default: &str, sensitive: bool) -> Self {
        let property = Self::new(name, default, default, sensitive);
        property.values.write().synthetic = true;
        property
    }

    /// Replaces both values and clears the synthetic flag.
    ///
    /// Returns true if the resolved value changed.
    pub(crate) fn update(&self, unresolved: String, resolved: String, sensitive: bool) -> bool {
        let mut values = self.values.write();
        let changed = values.resolved != resolved;
        values.unresolved = unresolved;
        values.resolved = resolved;
        values.sensitive = sensitive;
        values.synthetic = false;
        changed
    }

    /// The flat key, e.g. `server.hosts[0]`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value after the resolver chain.
    #[must_use]
    pub fn value(&self) -> String {
        self.values.read().resolved.clone()
    }

    /// The raw value as found in the source document.
    #[must_use]
    pub fn unresolved_value(&self) -> String {
        self.values.read().unresolved.clone()
    }

    /// Whether any resolver flagged this property as a secret.
    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.values.read().sensitive
    }

    /// Whether this property was synthesized from a default value.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.values.read().synthetic
    }

    /// The resolved value, or [`MASK`] if the property is sensitive.
    #[must_use]
    pub fn display_value(&self) -> String {
        let values = self.values.read();
        if values.sensitive {
            MASK.to_string()
        } else {
            values.resolved.clone()
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values.read();
        let mut s = f.debug_struct("Property");
        s.field("name", &self.name);
        if values.sensitive {
            s.field("value", &MASK).field("unresolved", &MASK);
        } else {
            s.field("value", &values.resolved)
                .field("unresolved", &values.unresolved);
        }
        s.field("sensitive", &values.sensitive)
            .field("synthetic", &values.synthetic)
            .finish()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.display_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_values() {
        let property = Property::new("db.host", "${HOST}", "localhost", false);

        assert_eq!(property.name(), "db.host");
        assert_eq!(property.value(), "localhost");
        assert_eq!(property.unresolved_value(), "${HOST}");
        assert!(!property.is_synthetic());
    }

    #[test]
    fn update_reports_resolved_change_only() {
        let property = Property::new("a", "raw1", "same", false);

        assert!(!property.update("raw2".to_string(), "same".to_string(), false));
        assert_eq!(property.unresolved_value(), "raw2");
        assert!(property.update("raw3".to_string(), "other".to_string(), false));
        assert_eq!(property.value(), "other");
    }

    #[test]
    fn update_clears_synthetic() {
        let property = Property::synthetic("x", "fallback", false);
        assert!(property.is_synthetic());
        assert_eq!(property.value(), "fallback");

        property.update("5".to_string(), "5".to_string(), false);

        assert!(!property.is_synthetic());
    }

    #[test]
    fn sensitive_values_are_masked() {
        let property = Property::new("db.password", "{cipher}abc", "hunter2", true);

        let debug = format!("{property:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("abc"));
        assert_eq!(property.to_string(), "db.password=******");
        assert_eq!(property.display_value(), MASK);
        assert_eq!(property.value(), "hunter2");
    }

    #[test]
    fn plain_values_are_displayed() {
        let property = Property::new("server.port", "8080", "8080", false);

        assert_eq!(property.to_string(), "server.port=8080");
        assert!(format!("{property:?}").contains("8080"));
    }
}
