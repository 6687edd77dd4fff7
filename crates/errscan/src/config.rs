//! Configuration file loading.
//!
//! ```toml
//! [extractor]
//! xcode_sentinel = "Building xArchive"
//! xcode_context_skip = 2
//! jasmine_max_message = 100
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};

/// Top-level errscan configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub extractor: ExtractorConfig,
}

impl CliConfig {
    /// Load the configuration from a TOML file. Missing keys keep defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CliConfig = toml::from_str(content).context("Invalid errscan TOML")?;
        Ok(config)
    }

    /// File settings when a path is given, otherwise defaults overlaid with
    /// the `ERRSCAN_*` environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = Self::from_file(path)?;
                tracing::debug!(path = %path.display(), "Loaded errscan config");
                Ok(config)
            }
            None => Ok(Self {
                extractor: ExtractorConfig::from_env(),
            }),
        }
    }
}
