//! Single-property facade.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::provider::{ChangeKind, ChangeSet, ConfigProvider, ProviderError};

use super::{Subscription, ValueError};

type ValueCallback = Arc<dyn Fn(&str) + Send + Sync>;

struct Shared {
    value: String,
    callback: Option<ValueCallback>,
}

/// Cached view of one property, kept current by change notifications.
///
/// When the property is removed the value falls back to the default if one
/// was given, otherwise the last value is kept.
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use dynconf::provider::ConfigProvider;
/// use dynconf::client::ConfigProperty;
///
/// # fn example(provider: &Arc<ConfigProvider>) -> Result<(), Box<dyn std::error::Error>> {
/// let port = ConfigProperty::with_default(provider, "server.port", "8080");
/// port.on_change(|value| println!("port is now {value}"), false);
/// let port: i32 = port.as_i32()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigProperty {
    name: String,
    default: Option<String>,
    shared: Arc<Mutex<Shared>>,
    _subscription: Subscription,
}

impl ConfigProperty {
    /// Binds to a property that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::PropertyNotFound`] if it is absent.
    pub fn new(provider: &Arc<ConfigProvider>, name: &str) -> Result<Self, ProviderError> {
        let value = provider.require(name)?.value();
        Ok(Self::subscribe(provider, name, None, value))
    }

    /// Binds to a property, synthesizing `default` if it is absent.
    #[must_use]
    pub fn with_default(provider: &Arc<ConfigProvider>, name: &str, default: &str) -> Self {
        let value = provider.property_or(name, default).value();
        Self::subscribe(provider, name, Some(default.to_string()), value)
    }

    fn subscribe(
        provider: &Arc<ConfigProvider>,
        name: &str,
        default: Option<String>,
        value: String,
    ) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            value,
            callback: None,
        }));

        let weak = Arc::downgrade(provider);
        let listener_shared = Arc::clone(&shared);
        let listener_name = name.to_string();
        let listener_default = default.clone();
        let id = provider.add_listener(move |changes: &ChangeSet| {
            let next = match changes.kind_of(&listener_name) {
                None => return,
                Some(ChangeKind::Removed) => match &listener_default {
                    Some(default) => default.clone(),
                    None => return,
                },
                Some(ChangeKind::Added | ChangeKind::Changed) => {
                    match weak.upgrade().and_then(|p| p.property(&listener_name)) {
                        Some(property) => property.value(),
                        None => return,
                    }
                }
            };

            let callback = {
                let mut shared = listener_shared.lock();
                if shared.value == next {
                    return;
                }
                shared.value.clone_from(&next);
                shared.callback.clone()
            };
            if let Some(callback) = callback {
                callback(&next);
            }
        });

        Self {
            name: name.to_string(),
            default,
            shared,
            _subscription: Subscription {
                provider: Arc::clone(provider),
                id,
            },
        }
    }

    /// The property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The default value, if one was given.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> String {
        self.shared.lock().value.clone()
    }

    /// The current value as an `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Integer`] if it does not parse.
    pub fn as_i32(&self) -> Result<i32, ValueError> {
        self.value()
            .trim()
            .parse()
            .map_err(|source| ValueError::Integer {
                name: self.name.clone(),
                source,
            })
    }

    /// The current value as an `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Integer`] if it does not parse.
    pub fn as_i64(&self) -> Result<i64, ValueError> {
        self.value()
            .trim()
            .parse()
            .map_err(|source| ValueError::Integer {
                name: self.name.clone(),
                source,
            })
    }

    /// The current value as a `bool` (`true`/`false`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Boolean`] for anything else.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        let value = self.value();
        let value = value.trim();
        if value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ValueError::Boolean {
                name: self.name.clone(),
            })
        }
    }

    /// Sets the change callback, replacing any previous one.
    ///
    /// With `fire_now`, the callback is also invoked once with the current
    /// value before returning.
    pub fn on_change<F>(&self, callback: F, fire_now: bool)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let callback: ValueCallback = Arc::new(callback);
        let current = {
            let mut shared = self.shared.lock();
            shared.callback = Some(Arc::clone(&callback));
            shared.value.clone()
        };
        if fire_now {
            callback(&current);
        }
    }

    /// Removes the change callback.
    pub fn clear_on_change(&self) {
        self.shared.lock().callback = None;
    }
}

impl std::fmt::Debug for ConfigProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProperty")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
