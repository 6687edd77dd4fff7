//! Extractor tunables
//!
//! `Default` is a fixed set of values so extraction stays a pure function of
//! its input. [`ExtractorConfig::from_env`] overlays `ERRSCAN_*` environment
//! variables for callers that want them.

use serde::{Deserialize, Serialize};

/// Log line that routes the whole input to the Xcode extractor.
pub const DEFAULT_XCODE_SENTINEL: &str = "Building xArchive";

/// Configuration for [`Extractor`](crate::Extractor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Substring whose presence in any line selects the Xcode extractor
    pub xcode_sentinel: String,
    /// Lines ignored after each Xcode record (caret marker and source echo)
    pub xcode_context_skip: usize,
    /// Jasmine messages longer than this many chars are shortened
    pub jasmine_max_message: usize,
    /// Chars kept from the start of a shortened Jasmine message
    pub jasmine_head: usize,
    /// Chars kept from the end of a shortened Jasmine message
    pub jasmine_tail: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            xcode_sentinel: DEFAULT_XCODE_SENTINEL.to_string(),
            xcode_context_skip: 2,
            jasmine_max_message: 100,
            jasmine_head: 80,
            jasmine_tail: 16,
        }
    }
}

impl ExtractorConfig {
    /// Defaults overlaid with `ERRSCAN_XCODE_SENTINEL`,
    /// `ERRSCAN_XCODE_CONTEXT_SKIP` and `ERRSCAN_JASMINE_MAX_MESSAGE`.
    /// Unparseable numbers keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(sentinel) = std::env::var("ERRSCAN_XCODE_SENTINEL") {
            if !sentinel.is_empty() {
                config.xcode_sentinel = sentinel;
            }
        }
        if let Some(skip) = env_usize("ERRSCAN_XCODE_CONTEXT_SKIP") {
            config.xcode_context_skip = skip;
        }
        if let Some(max) = env_usize("ERRSCAN_JASMINE_MAX_MESSAGE") {
            config.jasmine_max_message = max;
        }
        config
    }
}

fn env_usize(key: &str) -> Option<usize> {
    let value = std::env::var(key).ok()?;
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(key, value = %value, "Ignoring non-numeric extractor setting");
            None
        }
    }
}
