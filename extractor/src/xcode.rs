//! Swift/Xcode build log extractor
//!
//! Xcode interleaves real diagnostics with a lot of context, and puts the
//! location and the message on the same line:
//!
//! ```text
//! /path/AppDelegate.swift:8:1: error: Expected 'func' keyword (in target 'App' from project 'App')
//! eee
//! ^
//! ```
//!
//! A candidate line is paired with the next non-blank line that does not
//! start with `(`; that line is appended to the message. After each record a
//! fixed number of lines (the caret marker and source echo) is skipped so
//! restated source text does not trigger again. A candidate that never gets
//! a context line produces no record.

use crate::config::ExtractorConfig;
use crate::error::{ParseFailure, ParseResult};
use crate::record::{BuildFormat, Diagnostic, ErrorRecord};
use crate::token::parse_number;

const F: BuildFormat = BuildFormat::Xcode;

/// Per-call scanner state
pub(crate) struct XcodeScanner {
    /// Lines to skip after each record
    context_skip: usize,
    /// Candidate line waiting for its context line
    pending: Option<String>,
    /// Remaining lines to ignore
    skip: usize,
    diagnostics: Vec<Diagnostic>,
}

impl XcodeScanner {
    pub(crate) fn new(config: &ExtractorConfig) -> Self {
        Self {
            context_skip: config.xcode_context_skip,
            pending: None,
            skip: 0,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn feed(&mut self, line: &str) {
        if self.skip > 0 {
            self.skip -= 1;
            return;
        }

        let Some(pending) = self.pending.take() else {
            if is_candidate(line) {
                self.pending = Some(line.to_string());
            }
            return;
        };

        if is_candidate(line) {
            // A record needs its context line; an unpaired candidate is replaced
            tracing::trace!(candidate = %pending, "Xcode candidate replaced before pairing");
            self.pending = Some(line.to_string());
            return;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('(') {
            self.pending = Some(pending);
            return;
        }

        if self.emit(&pending, trimmed) {
            self.skip = self.context_skip;
        }
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        if let Some(ref pending) = self.pending {
            tracing::trace!(candidate = %pending, "Xcode candidate left without context");
        }
        self.diagnostics
    }

    fn emit(&mut self, candidate: &str, context: &str) -> bool {
        match parse_candidate(candidate, context) {
            Ok(record) => {
                self.diagnostics.push(Diagnostic::new(F, record));
                true
            }
            Err(failure) => {
                tracing::trace!(%failure, candidate, "Xcode candidate dropped");
                false
            }
        }
    }
}

/// Run the Xcode extractor over `lines`.
pub(crate) fn extract<S: AsRef<str>>(lines: &[S], config: &ExtractorConfig) -> Vec<Diagnostic> {
    let mut scanner = XcodeScanner::new(config);
    for line in lines {
        scanner.feed(line.as_ref());
    }
    scanner.finish()
}

fn is_candidate(line: &str) -> bool {
    line.contains(".swift:") && line.to_ascii_lowercase().contains(": error")
}

/// Parse `path:line:col: error: message` and append its context line.
fn parse_candidate(candidate: &str, context: &str) -> ParseResult<ErrorRecord> {
    let candidate = match candidate.find(" (in target ") {
        Some(idx) => &candidate[..idx],
        None => candidate,
    };

    let mut tokens = candidate.split(':');
    let path = tokens.next().unwrap_or_default();
    let line = tokens
        .next()
        .ok_or_else(|| ParseFailure::unrecognized(F, "missing line number"))?;
    let column = tokens
        .next()
        .ok_or_else(|| ParseFailure::unrecognized(F, "missing column number"))?;
    let line = parse_number(F, "line", line)?;
    let column = parse_number(F, "column", column)?;

    let lower = candidate.to_ascii_lowercase();
    let start = lower
        .find(": error:")
        .or_else(|| lower.find(": error "))
        .map(|idx| idx + ": error:".len())
        .ok_or_else(|| ParseFailure::unrecognized(F, "no error marker"))?;
    let message = candidate[start..].trim();

    let message = format!("{} {}", message, context.trim());
    ErrorRecord::from_one_based(F, path, line, column, &message)
}
