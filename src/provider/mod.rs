//! The configuration provider and its building blocks.
//!
//! This module provides:
//! - The provider itself ([`ConfigProvider`], [`ConfigProviderBuilder`], [`ProviderState`])
//! - Named entries of the namespace ([`Property`])
//! - Per-cycle change records ([`ChangeSet`], [`ChangeKind`], [`PropertyEvent`], [`diff`])
//! - Listener registration handles ([`ListenerId`])
//! - Error handling ([`ProviderError`])
//!
//! # Reconciliation
//!
//! Each cycle reads `<profile>/<document>` from every locator, flattens and
//! overlays the documents (locators in registration order, profiles in list
//! order, documents in registration order, so later entries win), diffs the
//! raw result against the committed namespace, resolves what changed,
//! commits atomically and then notifies observers.

mod background;
mod builder;
mod change;
mod engine;
mod error;
mod listeners;
mod property;
mod reload;


pub use builder::ConfigProviderBuilder;
pub use change::{ChangeKind, ChangeSet, PropertyEvent, diff};
pub use engine::{ConfigProvider, ProviderState};
pub use error::ProviderError;
pub use listeners::{ChangeListener, ListenerId, PropertyObserver};
pub use property::Property;
