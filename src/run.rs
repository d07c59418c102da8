//! Command execution.
//!
//! Builds a [`ConfigProvider`] from the validated configuration and runs
//! one of the `get`, `dump`, `resource` or `watch` commands against it.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::signal;

use dynconf::config::{Command, SourceConfig, ValidatedConfig};
use dynconf::http::RetryPolicy;
use dynconf::locator::{FileLocator, JsonFileStore, RemoteLocator, StoreLocator};
use dynconf::provider::{
    ChangeSet, ConfigProvider, ConfigProviderBuilder, Property, ProviderError,
};
use dynconf::resolver::{RemoteDecryptResolver, SecretHeuristicResolver};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Building the provider or looking something up failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// `watch` was requested with reloading disabled.
    #[error("Reloading is disabled (reload interval is 0); nothing to watch")]
    ReloadDisabled,
}

/// Runs `command` against a provider built from `config`.
///
/// # Errors
///
/// Returns an error if:
/// - No document could be loaded on the first reconciliation
/// - A value could not be resolved on the first reconciliation
/// - The requested property or resource does not exist
/// - `watch` is requested while reloading is disabled
///
/// Excluded from coverage - requires real sources and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, command: Command) -> Result<(), RunError> {
    match command {
        Command::Get { name, reveal } => {
            let provider = build_provider(&config, Duration::ZERO).await?;
            let property = provider.require(&name)?;
            println!("{}", render_value(&property, reveal));
        }
        Command::Dump { prefix, reveal } => {
            let provider = build_provider(&config, Duration::ZERO).await?;
            let properties: Vec<Arc<Property>> = match prefix {
                Some(prefix) => provider.properties_by_prefix(&prefix).into_values().collect(),
                None => provider.properties(),
            };
            for line in render_dump(&properties, reveal) {
                println!("{line}");
            }
        }
        Command::Resource { name } => {
            let provider = build_provider(&config, Duration::ZERO).await?;
            print!("{}", provider.resource_string(&name).await?);
        }
        Command::Watch => watch(&config).await?,
        Command::Init { .. } => {}
    }

    Ok(())
}

/// Builds the provider: one locator per source in registration order,
/// then the secret heuristic and the optional decrypt resolver.
async fn build_provider(
    config: &ValidatedConfig,
    reload_interval: Duration,
) -> Result<Arc<ConfigProvider>, ProviderError> {
    let builder = config
        .sources
        .iter()
        .fold(ConfigProvider::builder(), register_source)
        .resolver(SecretHeuristicResolver::from_regex(
            config.secret_pattern.clone(),
        ));

    let builder = match config.decrypt {
        Some(ref decrypt) => builder
            .resolver(
                RemoteDecryptResolver::new(decrypt.url.clone())
                    .with_timeout(decrypt.timeout)
                    .with_retry_policy(config.retry_policy.clone()),
            )
            .resolver_timeout(decrypt_budget(decrypt.timeout, &config.retry_policy)),
        None => builder,
    };

    config
        .documents
        .iter()
        .fold(builder, |builder, document| builder.document(document.as_str()))
        .profiles(config.profiles.iter().cloned())
        .reload_interval(reload_interval)
        .build()
        .await
}

/// Time one decrypt may take: every attempt timing out plus every backoff wait.
fn decrypt_budget(timeout: Duration, policy: &RetryPolicy) -> Duration {
    policy
        .backoff()
        .fold(timeout.saturating_mul(policy.max_attempts), Duration::saturating_add)
}

fn register_source(builder: ConfigProviderBuilder, source: &SourceConfig) -> ConfigProviderBuilder {
    match source {
        SourceConfig::Directory(path) => builder.locator(FileLocator::new(path.clone())),
        SourceConfig::Store(path) => {
            builder.locator(StoreLocator::new(JsonFileStore::new(path.clone())))
        }
        SourceConfig::Remote {
            url,
            service,
            timeout,
        } => builder.locator(
            RemoteLocator::new(url.clone(), service.as_str()).with_timeout(*timeout),
        ),
    }
}

/// Starts background reloading and logs every change set until a
/// shutdown signal arrives.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn watch(config: &ValidatedConfig) -> Result<(), RunError> {
    if config.reload_interval.is_zero() {
        return Err(RunError::ReloadDisabled);
    }

    let provider = build_provider(config, config.reload_interval).await?;
    tracing::info!(
        "Watching {} properties, reloading every {}s",
        provider.len(),
        config.reload_interval.as_secs()
    );

    let listener = provider.add_listener(|changes: &ChangeSet| {
        for line in describe_changes(changes) {
            tracing::info!("{line}");
        }
    });

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping...");

    provider.remove_listener(listener);
    provider.stop_reloading();
    Ok(())
}

/// Value printed by `get`; sensitive values are masked unless revealed.
fn render_value(property: &Property, reveal: bool) -> String {
    if reveal {
        property.value()
    } else {
        property.display_value()
    }
}

/// Lines printed by `dump`, one `name=value` per property.
fn render_dump(properties: &[Arc<Property>], reveal: bool) -> Vec<String> {
    properties
        .iter()
        .map(|p| format!("{}={}", p.name(), render_value(p, reveal)))
        .collect()
}

/// Log lines for one change set: `+` added, `~` changed, `-` removed.
fn describe_changes(changes: &ChangeSet) -> Vec<String> {
    let added = changes.added().iter().map(|name| format!("+ {name}"));
    let changed = changes.changed().iter().map(|name| format!("~ {name}"));
    let removed = changes.removed().iter().map(|name| format!("- {name}"));
    added.chain(changed).chain(removed).collect()
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
