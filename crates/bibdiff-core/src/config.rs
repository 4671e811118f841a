//! Configuration for bibdiff
//!
//! Holds the ordered source list, the title-cleaning policy and the initial
//! filter values. Loaded from `<config_dir>/bibdiff/config.toml` by default:
//!
//! ```toml
//! [[sources]]
//! name = "ads"
//! path = "exports/ads.bib"
//!
//! [[sources]]
//! name = "orcid"
//! path = "exports/orcid.bib"
//!
//! [title]
//! strip_in_clause = true
//! in_clause_min_prefix = 8
//!
//! [filter]
//! differences_only = true
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BibdiffConfig {
    /// Sources in column order
    pub sources: Vec<SourceConfig>,
    /// Title cleaning policy
    pub title: TitlePolicy,
    /// Initial filter values
    pub filter: FilterDefaults,
}

/// One named source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub path: PathBuf,
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Source named after the file it reads
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

/// How the "In:" container clause is stripped from titles.
///
/// Some exports inline the container title into the title field
/// (`Evaluating X In: Proceedings of Y`). When enabled, the part before a
/// standalone `In:` is kept if it is at least `in_clause_min_prefix`
/// characters long after trailing punctuation is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlePolicy {
    pub strip_in_clause: bool,
    pub in_clause_min_prefix: usize,
}

impl Default for TitlePolicy {
    fn default() -> Self {
        Self {
            strip_in_clause: true,
            in_clause_min_prefix: 8,
        }
    }
}

/// Filter values applied when the shell starts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    /// Author substring, case-insensitive
    pub author: String,
    /// Four-digit year or free-text year fragment
    pub year: String,
    /// Hide rows present in every source
    pub differences_only: bool,
}

impl BibdiffConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration comparing the given files, named after their file names
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            sources: paths.into_iter().map(SourceConfig::from_path).collect(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file; `.json` files are read as JSON, anything else as
    /// TOML. Relative source paths resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut config = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };

        if let Some(base) = path.parent() {
            for source in &mut config.sources {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }

        Ok(config)
    }

    /// Default config file location, `<config_dir>/bibdiff/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bibdiff").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one source is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "source for {} has an empty name",
                    source.path.display()
                )));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }

        Ok(())
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}
