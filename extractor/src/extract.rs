//! Extraction entry point
//!
//! Phases run once each, in a fixed order, and the first phase that yields
//! anything ends the run:
//!
//! ```text
//! error text + log lines ─ strip ANSI ─┬─ Xcode sentinel? ── Xcode extractor (terminal)
//!                                      ├─ whole-blob detectors
//!                                      ├─ line-oriented scanners
//!                                      └─ fallback pass
//! ```

use crate::ansi::strip_ansi;
use crate::config::ExtractorConfig;
use crate::record::{Diagnostic, ErrorRecord};
use crate::{blob, fallback, lines, xcode};
use serde::{Deserialize, Serialize};

/// Log line written by the Capacitor iOS runner before the failing
/// `xcodebuild` invocation.
const COMMAND_LINE_INVOCATION: &str = "[error] Command line invocation:";

/// The phase that produced an [`Extraction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPhase {
    Xcode,
    WholeBlob,
    LineScan,
    Fallback,
}

impl std::fmt::Display for ExtractionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xcode => write!(f, "xcode"),
            Self::WholeBlob => write!(f, "whole_blob"),
            Self::LineScan => write!(f, "line_scan"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Result of one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Phase that produced the diagnostics. `None` when nothing matched;
    /// the Xcode phase is reported even when it found nothing.
    pub phase: Option<ExtractionPhase>,
    /// Diagnostics in encounter order
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    fn from_phase(phase: ExtractionPhase, diagnostics: Vec<Diagnostic>) -> Self {
        tracing::debug!(%phase, count = diagnostics.len(), "Extracted build errors");
        Self {
            phase: Some(phase),
            diagnostics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Records without their format tags
    pub fn records(&self) -> Vec<ErrorRecord> {
        self.diagnostics.iter().map(|d| d.record.clone()).collect()
    }

    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.diagnostics.into_iter().map(|d| d.record).collect()
    }
}

/// Build-output error extractor.
///
/// Holds configuration only. Every call builds its own scanner state, so one
/// extractor can be shared across threads and reused.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract error locations from captured build output.
    ///
    /// `error_text` is the captured output blob and `logs` the same output
    /// split into lines; either may be empty. When `logs` is empty, it is
    /// derived by splitting `error_text` on newlines. `folder` is the project
    /// root and is only used as a literal substring in the Java and Jasmine
    /// heuristics.
    pub fn extract<S: AsRef<str>>(
        &self,
        error_text: &str,
        logs: &[S],
        folder: &str,
    ) -> Extraction {
        let text = strip_ansi(error_text);
        let lines: Vec<String> = if logs.is_empty() {
            split_lines(&text)
        } else {
            logs.iter().map(|l| normalize_line(l.as_ref())).collect()
        };

        let sentinel = self.config.xcode_sentinel.as_str();
        if !sentinel.is_empty() && lines.iter().any(|l| l.contains(sentinel)) {
            return Extraction::from_phase(
                ExtractionPhase::Xcode,
                xcode::extract(&lines, &self.config),
            );
        }

        if let Some(diagnostic) = blob::detect(&text) {
            return Extraction::from_phase(ExtractionPhase::WholeBlob, vec![diagnostic]);
        }

        let scan_from = match lines.first() {
            Some(first) if first.starts_with(COMMAND_LINE_INVOCATION) => 1,
            _ => 0,
        };
        let scanned = lines::scan(&lines[scan_from..], folder, &self.config);
        if !scanned.is_empty() {
            return Extraction::from_phase(ExtractionPhase::LineScan, scanned);
        }

        let fallback = if text.is_empty() {
            fallback::scan(&lines)
        } else {
            fallback::scan(&split_lines(&text))
        };
        if !fallback.is_empty() {
            return Extraction::from_phase(ExtractionPhase::Fallback, fallback);
        }

        tracing::debug!(lines = lines.len(), "No build errors recognized");
        Extraction::default()
    }
}

/// Extract error records with the default configuration.
///
/// Never panics; an empty result means no known format was recognized and the
/// caller should show the raw output instead.
pub fn extract_errors<S: AsRef<str>>(
    error_text: &str,
    logs: &[S],
    folder: &str,
) -> Vec<ErrorRecord> {
    Extractor::default()
        .extract(error_text, logs, folder)
        .into_records()
}

fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(normalize_line).collect()
}

fn normalize_line(line: &str) -> String {
    let line = strip_ansi(line);
    match line.strip_suffix('\r') {
        Some(stripped) => stripped.to_string(),
        None => line,
    }
}
