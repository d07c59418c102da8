//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Profiles, documents and local sources
    #[serde(default)]
    pub sources: SourcesSection,

    /// Remote config server
    #[serde(default)]
    pub remote: RemoteSection,

    /// Value resolution
    #[serde(default)]
    pub resolver: ResolverSection,

    /// Background reloading
    #[serde(default)]
    pub reload: ReloadSection,

    /// Retry policy for remote decryption
    #[serde(default)]
    pub retry: RetrySection,
}

/// Profiles, documents and local sources.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesSection {
    /// Profiles, lowest priority first
    #[serde(default)]
    pub profiles: Vec<String>,

    /// Document base names
    #[serde(default)]
    pub documents: Vec<String>,

    /// Directories holding `<profile>/<document>` files
    #[serde(default)]
    pub dirs: Vec<String>,

    /// JSON key-value store file
    pub store: Option<String>,
}

/// Remote config server section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteSection {
    /// Base URL
    pub url: Option<String>,

    /// Service name
    pub service: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// Value resolution section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverSection {
    /// Regex matched against property names to flag secrets
    pub secret_pattern: Option<String>,

    /// Decrypt endpoint for `{cipher}` values
    pub decrypt_url: Option<String>,

    /// Decrypt request timeout in seconds
    pub decrypt_timeout: Option<u64>,
}

/// Background reloading section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReloadSection {
    /// Interval in seconds; 0 disables reloading
    pub interval: Option<u64>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of attempts
    pub max_attempts: Option<u32>,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: Option<u64>,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# dynconf configuration file
#
# Sources are registered in this order: dirs, store, remote.
# When several sources define the same key, the later one wins.

[sources]
# Profiles, lowest priority first (CLI --profile replaces this list)
profiles = ["default"]

# Document base names loaded from each profile (default: application.yaml)
# documents = ["application.yaml"]

# Directories holding <profile>/<document> files; "~" expands to your home
# CLI --dir replaces this list
dirs = ["./config"]

# JSON key-value store file; missing documents are created empty
# store = "~/.local/share/dynconf/store.json"

[remote]
# Remote config server base URL; documents are fetched from
# <url>/<service>/<profile>/<document>
# url = "https://config.example.com/"
# service = "orders"

# Request timeout in seconds (default: 10)
# timeout = 10

[resolver]
# Regex matched against property names to mask secrets in output
# secret_pattern = '(?i)(password|secret|token)$'

# Endpoint that turns "{cipher}..." values into plaintext
# decrypt_url = "https://vault.example.com/decrypt"

# Decrypt request timeout in seconds (default: 5)
# decrypt_timeout = 5

[reload]
# Background reload interval in seconds, 0 disables (default: 30)
interval = 30

[retry]
# Maximum number of decrypt attempts (default: 3)
# max_attempts = 3

# Initial retry delay in milliseconds (default: 500)
# initial_delay_ms = 500

# Maximum retry delay in milliseconds (default: 5000)
# max_delay_ms = 5000

# Backoff multiplier (default: 2.0)
# multiplier = 2.0
"#
    .to_string()
}
