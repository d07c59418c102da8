//! Reconciliation: re-read every source, diff, commit and notify.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::document::{FlatMap, flatten, overlay};
use crate::locator::{SearchLocation, profile_path};

use super::{
    ChangeKind, ChangeSet, ConfigProvider, Property, PropertyEvent, ProviderError, ProviderState,
    diff,
};

/// The outcome of reading and merging every source.
struct Merged {
    values: FlatMap,
    loaded: usize,
    searched: Vec<SearchLocation>,
}

/// A raw value that made it through the resolver chain.
struct Resolved {
    unresolved: String,
    resolved: String,
    sensitive: bool,
}

impl ConfigProvider {
    /// Runs one reconciliation cycle.
    ///
    /// Returns the number of documents successfully decoded; `0` means every
    /// source failed or was empty-handed, in which case the namespace is left
    /// untouched. Failures are logged, never returned.
    pub async fn reload(&self) -> usize {
        let _guard = self.reload_lock.lock().await;

        let merged = self.load_merged().await;
        if merged.loaded == 0 {
            tracing::warn!(
                "No configuration documents loaded; keeping {} existing properties",
                self.len()
            );
            return 0;
        }

        let pending = self.pending_changes(&merged.values);
        let resolved = match self.resolve_pending(&merged.values, &pending, false).await {
            Ok(resolved) => resolved,
            // only the initial load turns resolver failures into errors
            Err(e) => {
                tracing::warn!("Reload aborted: {e}");
                return merged.loaded;
            }
        };

        self.commit_and_notify(&pending, resolved);
        merged.loaded
    }

    /// Performs the first reconciliation, failing loudly.
    pub(super) async fn initialize(&self) -> Result<usize, ProviderError> {
        let _guard = self.reload_lock.lock().await;

        let merged = self.load_merged().await;
        if merged.loaded == 0 {
            return Err(ProviderError::NoDocumentsLoaded {
                searched: merged.searched,
            });
        }

        let pending = self.pending_changes(&merged.values);
        let resolved = self.resolve_pending(&merged.values, &pending, true).await?;
        self.commit_and_notify(&pending, resolved);

        *self.state.lock() = ProviderState::Ready;
        tracing::info!(
            "Configuration loaded: {} documents, {} properties",
            merged.loaded,
            self.len()
        );
        Ok(merged.loaded)
    }

    /// Reads every `<profile>/<document>` from every locator and overlays
    /// them, lowest priority first.
    async fn load_merged(&self) -> Merged {
        let profiles = self.profiles();
        let mut merged = Merged {
            values: FlatMap::new(),
            loaded: 0,
            searched: Vec::new(),
        };

        for locator in &self.locators {
            for profile in &profiles {
                for document in &self.documents {
                    let path = profile_path(profile, document);
                    merged
                        .searched
                        .push(SearchLocation::new(locator.base_path(), profile, &path));

                    match locator.load_document(&path).await {
                        Ok(Some(tree)) => {
                            let layer = flatten(&tree);
                            tracing::debug!(
                                "Loaded '{path}' from {} ({} keys)",
                                locator.base_path(),
                                layer.len()
                            );
                            overlay(&mut merged.values, layer);
                            merged.loaded += 1;
                        }
                        Ok(None) => {
                            tracing::trace!("'{path}' not found in {}", locator.base_path());
                        }
                        Err(e) => {
                            tracing::warn!("Skipping '{path}' from {}: {e}", locator.base_path());
                        }
                    }
                }
            }
        }

        merged
    }

    /// Diffs the merged raw values against the committed raw values.
    ///
    /// Synthetic properties are left out of the committed side so they are
    /// never reported as removed, and are reported as added once a source
    /// provides them.
    fn pending_changes(&self, merged: &FlatMap) -> ChangeSet {
        let committed: IndexMap<String, String> = self
            .namespace
            .read()
            .iter()
            .filter(|(_, property)| !property.is_synthetic())
            .map(|(name, property)| (name.clone(), property.unresolved_value()))
            .collect();

        diff(&committed, merged)
    }

    /// Runs the resolver chain over every added or changed raw value.
    ///
    /// Outside the first load, a failure only drops that key from this
    /// cycle: an existing property keeps its previous values and a new key
    /// stays absent, so the next cycle retries.
    async fn resolve_pending(
        &self,
        merged: &FlatMap,
        pending: &ChangeSet,
        initial: bool,
    ) -> Result<IndexMap<String, Resolved>, ProviderError> {
        let mut resolved = IndexMap::new();

        for name in pending.added().iter().chain(pending.changed()) {
            let Some(raw) = merged.get(name) else {
                continue;
            };
            match self.resolvers.resolve(name, raw).await {
                Ok(value) => {
                    resolved.insert(
                        name.clone(),
                        Resolved {
                            unresolved: raw.clone(),
                            resolved: value,
                            sensitive: self.resolvers.is_sensitive(name, raw),
                        },
                    );
                }
                Err(source) if initial => {
                    return Err(ProviderError::InitialResolution {
                        name: name.clone(),
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!("Keeping previous value of '{name}': {e}");
                }
            }
        }

        Ok(resolved)
    }

    /// Commits resolved values and removals under the namespace write lock.
    fn commit(
        &self,
        pending: &ChangeSet,
        resolved: IndexMap<String, Resolved>,
    ) -> (ChangeSet, Vec<PropertyEvent>) {
        let mut changes = ChangeSet::new();
        let mut events = Vec::new();
        let mut namespace = self.namespace.write();

        for (name, value) in resolved {
            if let Some(property) = namespace.get(&name).cloned() {
                if property.update(value.unresolved, value.resolved, value.sensitive) {
                    changes.record(ChangeKind::Changed, name.as_str());
                    events.push(PropertyEvent::new(ChangeKind::Changed, property));
                }
            } else {
                let property = Arc::new(Property::new(
                    name.as_str(),
                    value.unresolved,
                    value.resolved,
                    value.sensitive,
                ));
                changes.record(ChangeKind::Added, name.as_str());
                events.push(PropertyEvent::new(ChangeKind::Added, Arc::clone(&property)));
                namespace.insert(name, property);
            }
        }

        for name in pending.removed() {
            let is_synthetic = namespace.get(name).is_some_and(|p| p.is_synthetic());
            if is_synthetic {
                continue;
            }
            if let Some(property) = namespace.shift_remove(name) {
                changes.record(ChangeKind::Removed, name.as_str());
                events.push(PropertyEvent::new(ChangeKind::Removed, property));
            }
        }

        (changes, events)
    }

    fn commit_and_notify(&self, pending: &ChangeSet, resolved: IndexMap<String, Resolved>) {
        let (changes, events) = self.commit(pending, resolved);

        if changes.is_empty() {
            tracing::debug!("Reload complete, no changes");
            return;
        }
        tracing::info!(
            "Configuration changed: {} added, {} changed, {} removed",
            changes.added().len(),
            changes.changed().len(),
            changes.removed().len()
        );

        for event in &events {
            self.listeners.notify_property(event);
        }
        self.listeners.notify_changes(&changes);
    }
}
