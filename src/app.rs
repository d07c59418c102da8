//! Startup helpers for the binary: exit codes, logging and error hints.

use dynconf::config::{ConfigError, field};
use dynconf::provider::ProviderError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::run::RunError;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - bad flags, bad config file, no source.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - nothing loaded, unknown property or resource.
    ///
    /// A function because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

const INIT_HINT: &str = "Run 'dynconf init' to generate a configuration template.";

/// Returns a follow-up hint for configuration errors that have an obvious fix.
pub fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::SOURCE => Some(INIT_HINT),
        ConfigError::FileRead { .. } => Some(INIT_HINT),
        ConfigError::InvalidName { .. } => {
            Some("Profile and document names are single path segments, e.g. 'prod'.")
        }
        _ => None,
    }
}

/// Returns a follow-up hint for runtime errors that have an obvious fix.
pub fn run_hint(error: &RunError) -> Option<&'static str> {
    match error {
        RunError::Provider(ProviderError::NoDocumentsLoaded { .. }) => {
            Some("Check --dir, --profile and --document, or the [sources] table.")
        }
        RunError::Provider(ProviderError::PropertyNotFound { .. }) => {
            Some("Run 'dynconf dump' to list the loaded properties.")
        }
        RunError::ReloadDisabled => Some("Pass --reload-interval with a value above 0."),
        _ => None,
    }
}

/// Prints `hint` on stderr after a blank line, if there is one.
pub fn print_hint(hint: Option<&str>) {
    if let Some(hint) = hint {
        eprintln!("\n{hint}");
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Logs go to stderr so `get`, `dump` and `resource` output stays pipeable.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
