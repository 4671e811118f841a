//! Error types for bibdiff-core
//!
//! Parsing, normalization and reconciliation never fail. Only the surfaces
//! that touch the outside world (configuration and source files) return
//! these errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bibdiff operations
pub type Result<T> = std::result::Result<T, BibdiffError>;

/// Main error type for bibdiff operations
#[derive(Error, Debug)]
pub enum BibdiffError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Source loading errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed TOML
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("Cannot serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Malformed JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value that parses but makes no sense
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Source loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    /// Source file could not be read
    #[error("Cannot read source '{name}' from {path}: {source}")]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
