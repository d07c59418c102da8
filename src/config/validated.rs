//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::http::RetryPolicy;
use crate::resolver::SecretHeuristicResolver;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// A configuration source, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// Directory holding `<profile>/<document>` files.
    Directory(PathBuf),
    /// JSON key-value store file.
    Store(PathBuf),
    /// Remote config server.
    Remote {
        /// Base URL
        url: Url,
        /// Service name appended to the base URL
        service: String,
        /// Request timeout
        timeout: Duration,
    },
}

impl fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory(path) => write!(f, "dir:{}", path.display()),
            Self::Store(path) => write!(f, "store:{}", path.display()),
            Self::Remote { url, service, .. } => write!(f, "remote:{url}{service}"),
        }
    }
}

/// Remote decryption endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptConfig {
    /// Endpoint receiving the ciphertext
    pub url: Url,
    /// Request timeout
    pub timeout: Duration,
}

/// Fully validated configuration ready for use by the application.
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Profiles, lowest priority first
    pub profiles: Vec<String>,

    /// Document base names
    pub documents: Vec<String>,

    /// Sources in registration order; later sources override earlier ones
    pub sources: Vec<SourceConfig>,

    /// Remote decryption, if configured
    pub decrypt: Option<DecryptConfig>,

    /// Pattern flagging sensitive property names
    pub secret_pattern: Regex,

    /// Retry policy for remote decryption
    pub retry_policy: RetryPolicy,

    /// Background reload interval; zero disables reloading
    pub reload_interval: Duration,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<String> = self.sources.iter().map(ToString::to_string).collect();
        let decrypt = self
            .decrypt
            .as_ref()
            .map_or_else(|| "none".to_string(), |d| d.url.to_string());

        write!(
            f,
            "Config {{ profiles: [{}], documents: [{}], sources: [{}], decrypt: {}, \
             retry: {}x/{}ms, reload_interval: {}s }}",
            self.profiles.join(", "),
            self.documents.join(", "),
            sources.join(", "),
            decrypt,
            self.retry_policy.max_attempts,
            self.retry_policy.initial_delay.as_millis(),
            self.reload_interval.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values. CLI lists
    /// replace TOML lists entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source is configured
    /// - A URL is invalid, or a remote URL has no service
    /// - A profile or document name is empty or escapes its directory
    /// - The secret pattern is not a valid regex
    /// - A timeout is zero or the retry settings are inconsistent
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let profiles = Self::resolve_profiles(cli, toml)?;
        let documents = Self::resolve_documents(cli, toml)?;
        let sources = Self::resolve_sources(cli, toml)?;
        let decrypt = Self::resolve_decrypt(cli, toml)?;
        let secret_pattern = Self::resolve_secret_pattern(toml)?;
        let retry_policy = Self::build_retry_policy(cli, toml)?;

        let reload_interval = Duration::from_secs(
            cli.reload_interval
                .or_else(|| toml.and_then(|t| t.reload.interval))
                .unwrap_or(defaults::RELOAD_INTERVAL_SECS),
        );

        Ok(Self {
            profiles,
            documents,
            sources,
            decrypt,
            secret_pattern,
            retry_policy,
            reload_interval,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_profiles(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Vec<String>, ConfigError> {
        let profiles = pick_list(&cli.profiles, toml.map(|t| &t.sources.profiles))
            .unwrap_or_else(|| vec![defaults::PROFILE.to_string()]);
        validate_names("profile", &profiles)?;
        Ok(profiles)
    }

    fn resolve_documents(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Vec<String>, ConfigError> {
        let documents = pick_list(&cli.documents, toml.map(|t| &t.sources.documents))
            .unwrap_or_else(|| vec![defaults::DOCUMENT.to_string()]);
        validate_names("document", &documents)?;
        Ok(documents)
    }

    fn resolve_sources(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<SourceConfig>, ConfigError> {
        let dirs: Vec<PathBuf> = if cli.dirs.is_empty() {
            toml.map(|t| t.sources.dirs.iter().map(PathBuf::from).collect())
                .unwrap_or_default()
        } else {
            cli.dirs.clone()
        };
        let mut sources: Vec<SourceConfig> = dirs
            .iter()
            .map(|dir| SourceConfig::Directory(expand_home(dir)))
            .collect();

        let store = cli
            .store
            .clone()
            .or_else(|| toml.and_then(|t| t.sources.store.as_ref().map(PathBuf::from)));
        if let Some(path) = store {
            sources.push(SourceConfig::Store(expand_home(&path)));
        }

        if let Some(remote) = Self::resolve_remote(cli, toml)? {
            sources.push(remote);
        }

        if sources.is_empty() {
            return Err(ConfigError::missing(
                field::SOURCE,
                "Use --dir, --store or --remote-url, or set them in the config file",
            ));
        }

        Ok(sources)
    }

    fn resolve_remote(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<SourceConfig>, ConfigError> {
        let remote = toml.map(|t| &t.remote);
        let Some(url_str) = cli
            .remote_url
            .as_deref()
            .or_else(|| remote.and_then(|r| r.url.as_deref()))
        else {
            return Ok(None);
        };

        let url = parse_url(url_str)?;
        let service = cli
            .service
            .clone()
            .or_else(|| remote.and_then(|r| r.service.clone()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::SERVICE,
                    "Use --service or set remote.service in config file",
                )
            })?;
        validate_name("service", &service)?;

        let timeout = positive_secs(
            "remote.timeout",
            cli.remote_timeout
                .or_else(|| remote.and_then(|r| r.timeout))
                .unwrap_or(defaults::REMOTE_TIMEOUT_SECS),
        )?;

        Ok(Some(SourceConfig::Remote {
            url,
            service,
            timeout,
        }))
    }

    fn resolve_decrypt(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<DecryptConfig>, ConfigError> {
        let resolver = toml.map(|t| &t.resolver);
        let Some(url_str) = cli
            .decrypt_url
            .as_deref()
            .or_else(|| resolver.and_then(|r| r.decrypt_url.as_deref()))
        else {
            return Ok(None);
        };

        let timeout = positive_secs(
            "resolver.decrypt_timeout",
            cli.decrypt_timeout
                .or_else(|| resolver.and_then(|r| r.decrypt_timeout))
                .unwrap_or(defaults::DECRYPT_TIMEOUT_SECS),
        )?;

        Ok(Some(DecryptConfig {
            url: parse_url(url_str)?,
            timeout,
        }))
    }

    fn resolve_secret_pattern(toml: Option<&TomlConfig>) -> Result<Regex, ConfigError> {
        let pattern = toml
            .and_then(|t| t.resolver.secret_pattern.as_deref())
            .unwrap_or(SecretHeuristicResolver::DEFAULT_PATTERN);

        Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        // Priority: CLI explicit > TOML > default
        let max_attempts = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_attempts))
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS);

        let initial_delay_ms = cli
            .retry_delay
            .or_else(|| retry.and_then(|r| r.initial_delay_ms))
            .unwrap_or(defaults::RETRY_INITIAL_DELAY_MS);

        let max_delay_ms = retry
            .and_then(|r| r.max_delay_ms)
            .unwrap_or(defaults::RETRY_MAX_DELAY_MS);

        let multiplier = retry
            .and_then(|r| r.multiplier)
            .unwrap_or(defaults::RETRY_MULTIPLIER);

        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if initial_delay_ms == 0 {
            return Err(ConfigError::InvalidRetry(
                "initial_delay_ms must be greater than 0".to_string(),
            ));
        }

        if multiplier <= 0.0 || !multiplier.is_finite() {
            return Err(ConfigError::InvalidRetry(
                "multiplier must be a positive finite number".to_string(),
            ));
        }

        if max_delay_ms < initial_delay_ms {
            return Err(ConfigError::InvalidRetry(format!(
                "max_delay_ms ({max_delay_ms}) must be >= initial_delay_ms ({initial_delay_ms})"
            )));
        }

        Ok(RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_initial_delay(Duration::from_millis(initial_delay_ms))
            .with_max_delay(Duration::from_millis(max_delay_ms))
            .with_multiplier(multiplier))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or when no home directory is known, are
/// returned unchanged.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

// Helper functions

/// CLI list if non-empty, else a non-empty TOML list.
fn pick_list(cli: &[String], toml: Option<&Vec<String>>) -> Option<Vec<String>> {
    if !cli.is_empty() {
        return Some(cli.to_vec());
    }
    toml.filter(|list| !list.is_empty()).cloned()
}

fn validate_names(field: &'static str, values: &[String]) -> Result<(), ConfigError> {
    values.iter().try_for_each(|value| validate_name(field, value))
}

fn validate_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let reason = if value.trim().is_empty() {
        "must not be empty"
    } else if value.contains('/') || value.contains('\\') {
        "must not contain path separators"
    } else if value == "." || value == ".." {
        "must not be a relative directory"
    } else {
        return Ok(());
    };

    Err(ConfigError::InvalidName {
        field,
        value: value.to_string(),
        reason,
    })
}

fn parse_url(url_str: &str) -> Result<Url, ConfigError> {
    Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
        url: url_str.to_string(),
        reason: e.to_string(),
    })
}

fn positive_secs(field: &'static str, seconds: u64) -> Result<Duration, ConfigError> {
    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}
