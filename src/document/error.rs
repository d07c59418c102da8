//! Error types for document decoding.

use thiserror::Error;

/// A document was found but could not be decoded.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is not valid UTF-8 (required by text-only formats).
    #[error("Document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Malformed YAML.
    #[error("Failed to parse YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed JSON.
    #[error("Failed to parse JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML.
    #[error("Failed to parse TOML document: {0}")]
    Toml(#[from] toml::de::Error),
}
