//! Document format detection and decoding.

use std::path::Path;

use serde_json::Value;

use super::DocumentError;

/// Supported hierarchical document formats.
///
/// YAML is the reference format and the fallback for unknown extensions
/// (a JSON document is also valid YAML).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// `.yaml` / `.yml`
    #[default]
    Yaml,
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl DocumentFormat {
    /// Picks the format from a resource path's extension.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    /// Decodes raw bytes into a format-agnostic tree.
    ///
    /// Blank documents decode to [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the bytes are not a well-formed
    /// document of this format.
    pub fn decode(self, bytes: &[u8]) -> Result<Value, DocumentError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        match self {
            Self::Yaml => Ok(serde_yaml::from_slice(bytes)?),
            Self::Json => Ok(serde_json::from_slice(bytes)?),
            Self::Toml => Ok(toml::from_str(std::str::from_utf8(bytes)?)?),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
            Self::Toml => write!(f, "toml"),
        }
    }
}
