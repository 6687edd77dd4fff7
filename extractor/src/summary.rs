//! Compact summary of an extraction, small enough for a status line.

use crate::extract::{Extraction, ExtractionPhase};
use crate::record::{BuildFormat, ErrorRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Aggregate view of an [`Extraction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub total: usize,
    pub phase: Option<ExtractionPhase>,
    /// Record count per recognizer
    pub by_format: BTreeMap<BuildFormat, usize>,
    /// Distinct files in encounter order
    pub files: Vec<String>,
    /// The record a consumer surfaces first
    pub first: Option<ErrorRecord>,
}

impl ExtractionSummary {
    pub fn from_extraction(extraction: &Extraction) -> Self {
        let mut by_format = BTreeMap::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut files: Vec<String> = Vec::new();
        for diagnostic in &extraction.diagnostics {
            *by_format.entry(diagnostic.format).or_insert(0) += 1;
            if seen.insert(diagnostic.record.uri.as_str()) {
                files.push(diagnostic.record.uri.clone());
            }
        }

        Self {
            total: extraction.diagnostics.len(),
            phase: extraction.phase,
            by_format,
            files,
            first: extraction.diagnostics.first().map(|d| d.record.clone()),
        }
    }

    /// One-line text summary.
    ///
    /// Example: `[3 errors] line_scan | eslint:2, jest:1 | 2 files | first=src/a.ts:13:1`
    pub fn compact_text(&self) -> String {
        if self.total == 0 {
            return "[no errors]".to_string();
        }

        let noun = if self.total == 1 { "error" } else { "errors" };
        let head = match self.phase {
            Some(phase) => format!("[{} {}] {}", self.total, noun, phase),
            None => format!("[{} {}]", self.total, noun),
        };
        let mut parts = vec![head];

        let mut counts: Vec<(&BuildFormat, &usize)> = self.by_format.iter().collect();
        // Most frequent first, ties in format order
        counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        let formats: Vec<String> = counts
            .iter()
            .map(|(format, count)| format!("{}:{}", format, count))
            .collect();
        parts.push(formats.join(", "));

        let files = if self.files.len() == 1 { "file" } else { "files" };
        parts.push(format!("{} {}", self.files.len(), files));

        if let Some(ref first) = self.first {
            parts.push(format!("first={}", first.location()));
        }
        parts.join(" | ")
    }

    /// JSON string for machine consumption.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"serialization failed"}"#.to_string())
    }
}
