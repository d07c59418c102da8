//! Client facades over a [`ConfigProvider`](crate::provider::ConfigProvider).
//!
//! Each facade keeps its own cached view, refreshed by a provider-level
//! listener that is unregistered when the facade is dropped:
//! - [`ConfigProperty`]: one value, with typed accessors and a change callback
//! - [`ConfigPropertyGroup`]: every property under a prefix
//! - [`ConfigPropertyList`]: the scalar list `name[0]`, `name[1]`, ...

mod error;
mod group;
mod list;
mod property;

#[cfg(test)]
mod client_tests;

pub use error::ValueError;
pub use group::ConfigPropertyGroup;
pub use list::ConfigPropertyList;
pub use property::ConfigProperty;

use std::sync::Arc;

use crate::provider::{ConfigProvider, ListenerId};

/// Unregisters a provider-level listener on drop.
struct Subscription {
    provider: Arc<ConfigProvider>,
    id: ListenerId,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.provider.remove_listener(self.id);
    }
}
