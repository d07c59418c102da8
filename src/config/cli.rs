//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// dynconf: layered, hot-reloading configuration
///
/// Loads `<profile>/<document>` from directories, a key-value store file
/// and a remote config server, overlays them and serves the flattened
/// properties.
#[derive(Debug, Parser)]
#[command(name = "dynconf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Profile to load, lowest priority first (can be specified multiple times)
    #[arg(long = "profile", short = 'p', value_name = "NAME", global = true)]
    pub profiles: Vec<String>,

    /// Document base name (can be specified multiple times)
    #[arg(long = "document", value_name = "NAME", global = true)]
    pub documents: Vec<String>,

    /// Directory holding `<profile>/<document>` files (can be specified multiple times)
    #[arg(long = "dir", short = 'd', value_name = "PATH", global = true)]
    pub dirs: Vec<PathBuf>,

    /// JSON key-value store file
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Remote config server base URL
    #[arg(long = "remote-url", value_name = "URL", global = true)]
    pub remote_url: Option<String>,

    /// Service name on the remote config server
    #[arg(long, global = true)]
    pub service: Option<String>,

    /// Remote request timeout in seconds
    #[arg(long = "remote-timeout", value_name = "SECS", global = true)]
    pub remote_timeout: Option<u64>,

    /// Decrypt endpoint for `{cipher}` values
    #[arg(long = "decrypt-url", value_name = "URL", global = true)]
    pub decrypt_url: Option<String>,

    /// Decrypt request timeout in seconds
    #[arg(long = "decrypt-timeout", value_name = "SECS", global = true)]
    pub decrypt_timeout: Option<u64>,

    /// Maximum number of decrypt attempts
    #[arg(long = "retry-max", global = true)]
    pub retry_max: Option<u32>,

    /// Initial retry delay in milliseconds
    #[arg(long = "retry-delay", value_name = "MS", global = true)]
    pub retry_delay: Option<u64>,

    /// Background reload interval in seconds (0 disables)
    #[arg(long = "reload-interval", value_name = "SECS", global = true)]
    pub reload_interval: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for dynconf
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one resolved property
    Get {
        /// Flat property name, e.g. `server.port` or `hosts[0]`
        name: String,

        /// Print sensitive values in clear
        #[arg(long)]
        reveal: bool,
    },

    /// Print every property
    Dump {
        /// Only print properties under this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Print sensitive values in clear
        #[arg(long)]
        reveal: bool,
    },

    /// Print a raw resource `<profile>/<name>`
    Resource {
        /// Resource name, e.g. `banner.txt`
        name: String,
    },

    /// Keep reloading and log every change until interrupted
    Watch,

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
