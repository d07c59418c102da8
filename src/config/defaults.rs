//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default profile list.
pub const PROFILE: &str = "default";

/// Default document base name.
pub const DOCUMENT: &str = "application.yaml";

/// Default background reload interval in seconds (0 disables reloading).
pub const RELOAD_INTERVAL_SECS: u64 = 30;

/// Default remote config server request timeout in seconds.
pub const REMOTE_TIMEOUT_SECS: u64 = 10;

/// Default decrypt endpoint request timeout in seconds.
pub const DECRYPT_TIMEOUT_SECS: u64 = 5;

/// Default maximum number of decrypt attempts.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default initial retry delay in milliseconds.
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;

/// Default maximum retry delay in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 5_000;

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = 2.0;

/// Default configuration file written by `init`.
pub const CONFIG_FILE: &str = "dynconf.toml";

/// Default reload interval as Duration.
#[must_use]
pub const fn reload_interval() -> Duration {
    Duration::from_secs(RELOAD_INTERVAL_SECS)
}

/// Default remote timeout as Duration.
#[must_use]
pub const fn remote_timeout() -> Duration {
    Duration::from_secs(REMOTE_TIMEOUT_SECS)
}

/// Default decrypt timeout as Duration.
#[must_use]
pub const fn decrypt_timeout() -> Duration {
    Duration::from_secs(DECRYPT_TIMEOUT_SECS)
}
