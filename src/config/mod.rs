//! Configuration layer for the `dynconf` binary.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! List options (`--profile`, `--document`, `--dir`) **replace** the TOML
//! lists entirely when given on the command line.
//!
//! # Source order
//!
//! Sources are registered as directories (in the order given), then the
//! store file, then the remote server. A later source overrides an earlier
//! one for the same key.
//!
//! # TOML-Only Options
//!
//! - `resolver.secret_pattern` - regex flagging sensitive property names
//! - `retry.max_delay_ms`, `retry.multiplier` - backoff tuning

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{
    DecryptConfig, SourceConfig, ValidatedConfig, expand_home, write_default_config,
};
