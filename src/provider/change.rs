//! Change detection between reconciliation cycles.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::Property;

/// The kind of change a property went through in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The property appeared.
    Added,
    /// The property's resolved value changed.
    Changed,
    /// No source provides the property anymore.
    Removed,
}

/// A change delivered to the observers of one property.
#[derive(Debug, Clone)]
pub struct PropertyEvent {
    kind: ChangeKind,
    property: Arc<Property>,
}

impl PropertyEvent {
    /// Creates a property event.
    #[must_use]
    pub const fn new(kind: ChangeKind, property: Arc<Property>) -> Self {
        Self { kind, property }
    }

    /// What happened to the property.
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// The property; for removals it holds the last committed values.
    #[must_use]
    pub const fn property(&self) -> &Arc<Property> {
        &self.property
    }

    /// Shorthand for `self.property().name()`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.property.name()
    }
}

/// Names added, changed and removed in one reconciliation cycle.
///
/// Each set keeps the order in which names were recorded. A name appears in
/// at most one set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    added: IndexSet<String>,
    changed: IndexSet<String>,
    removed: IndexSet<String>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` under `kind`.
    pub fn record(&mut self, kind: ChangeKind, name: impl Into<String>) {
        let name = name.into();
        match kind {
            ChangeKind::Added => self.added.insert(name),
            ChangeKind::Changed => self.changed.insert(name),
            ChangeKind::Removed => self.removed.insert(name),
        };
    }

    /// Names that appeared.
    #[must_use]
    pub const fn added(&self) -> &IndexSet<String> {
        &self.added
    }

    /// Names whose value changed.
    #[must_use]
    pub const fn changed(&self) -> &IndexSet<String> {
        &self.changed
    }

    /// Names that disappeared.
    #[must_use]
    pub const fn removed(&self) -> &IndexSet<String> {
        &self.removed
    }

    /// Returns true if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }

    /// Total number of affected names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.added.len() + self.changed.len() + self.removed.len()
    }

    /// Returns how `name` was affected, if at all.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<ChangeKind> {
        if self.added.contains(name) {
            Some(ChangeKind::Added)
        } else if self.changed.contains(name) {
            Some(ChangeKind::Changed)
        } else if self.removed.contains(name) {
            Some(ChangeKind::Removed)
        } else {
            None
        }
    }

    /// Returns true if `name` was affected.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    /// All affected names: added, then changed, then removed.
    pub fn affected(&self) -> impl Iterator<Item = &str> {
        self.added
            .iter()
            .chain(&self.changed)
            .chain(&self.removed)
            .map(String::as_str)
    }
}

/// Compares two raw namespaces.
///
/// Pure function over unresolved values:
/// - keys only in `new` are added, in `new`'s order
/// - keys in both with different values are changed, in `new`'s order
/// - keys only in `old` are removed, in `old`'s order
#[must_use]
pub fn diff(old: &IndexMap<String, String>, new: &IndexMap<String, String>) -> ChangeSet {
    let mut changes = ChangeSet::new();

    for (name, value) in new {
        match old.get(name) {
            None => changes.record(ChangeKind::Added, name.as_str()),
            Some(previous) if previous != value => {
                changes.record(ChangeKind::Changed, name.as_str());
            }
            Some(_) => {}
        }
    }

    for name in old.keys() {
        if !new.contains_key(name) {
            changes.record(ChangeKind::Removed, name.as_str());
        }
    }

    changes
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;
