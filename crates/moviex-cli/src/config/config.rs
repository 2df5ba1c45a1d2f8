//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use moviex_api::omdb::{MediaType, ReleaseYear, SearchFilters};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// OMDb connection settings.
    #[serde(default)]
    pub omdb: OmdbConfig,
    /// Default search filters.
    #[serde(default)]
    pub search: SearchConfig,
}

/// OMDb connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OmdbConfig {
    /// API key sent as the `apikey` parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (defaults to the public endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Filters applied when a session starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Default title kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    /// Default release year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<ReleaseYear>,
}

impl SearchConfig {
    /// Returns the configured defaults as session filters.
    #[must_use]
    pub const fn filters(self) -> SearchFilters {
        SearchFilters {
            media_type: self.media_type,
            year: self.year,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Picks the API key: the environment value wins over the config file.
    ///
    /// Blank values count as unset.
    #[must_use]
    pub fn resolve_api_key(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                self.omdb
                    .api_key
                    .clone()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}
