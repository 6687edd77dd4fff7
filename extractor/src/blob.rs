//! Whole-blob detectors
//!
//! Each detector looks at the entire captured text for one well-known block
//! shape. Detectors are tried in table order and the first record wins.

use crate::error::{ParseFailure, ParseResult};
use crate::record::{BuildFormat, Diagnostic, ErrorRecord};
use crate::token::{parse_number, split_location, strip_code_label};
use regex::Regex;
use std::sync::LazyLock;

/// Trailing `[plugin angular-compiler]` tag on ESBuild messages
static PLUGIN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\[plugin [^\]]*\]\s*$").expect("plugin tag pattern is a valid regex")
});

/// A detector for one whole-text shape
pub(crate) struct BlobDetector {
    pub format: BuildFormat,
    /// Cheap test on the whole text
    pub applies: fn(&str) -> bool,
    pub parse: fn(&[&str]) -> ParseResult<ErrorRecord>,
}

/// Tried in order; the first success wins.
pub(crate) const BLOB_DETECTORS: &[BlobDetector] = &[
    BlobDetector {
        format: BuildFormat::NextJs,
        applies: looks_like_next_js,
        parse: parse_next_js,
    },
    BlobDetector {
        format: BuildFormat::LintStyle,
        applies: looks_like_lint_style,
        parse: parse_lint_style,
    },
    BlobDetector {
        format: BuildFormat::Esbuild,
        applies: looks_like_esbuild,
        parse: parse_esbuild,
    },
];

fn looks_like_next_js(text: &str) -> bool {
    text.starts_with("Failed to compile.")
}

fn looks_like_lint_style(text: &str) -> bool {
    text.contains("Error:")
}

fn looks_like_esbuild(text: &str) -> bool {
    text.starts_with("✘ [ERROR]")
}

/// Run the detector table against `text`.
pub(crate) fn detect(text: &str) -> Option<Diagnostic> {
    if text.is_empty() {
        return None;
    }
    let lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    for detector in BLOB_DETECTORS {
        if !(detector.applies)(text) {
            continue;
        }
        match (detector.parse)(&lines) {
            Ok(record) => {
                tracing::debug!(format = %detector.format, uri = %record.uri, "Whole-blob match");
                return Some(Diagnostic::new(detector.format, record));
            }
            Err(failure) => tracing::trace!(%failure, "Whole-blob candidate dropped"),
        }
    }
    None
}

fn line_at<'a>(lines: &[&'a str], index: usize, format: BuildFormat) -> ParseResult<&'a str> {
    lines
        .get(index)
        .copied()
        .ok_or_else(|| ParseFailure::unrecognized(format, "input too short"))
}

/// ```text
/// Failed to compile.
///
/// ./src/app/page.tsx
/// Error:   x Expected ';', '}' or <eof>
///    ,-[/app/src/app/page.tsx:3:1]
/// ```
///
/// When line 3 carries only the `Error:` label, the message is taken from the
/// first non-blank line before the marker.
fn parse_next_js(lines: &[&str]) -> ParseResult<ErrorRecord> {
    const F: BuildFormat = BuildFormat::NextJs;
    let header = line_at(lines, 3, F)?;
    let (_, message) = header
        .split_once("Error:")
        .ok_or_else(|| ParseFailure::unrecognized(F, "line 3 has no Error: label"))?;

    let (marker_index, marker) = lines
        .iter()
        .enumerate()
        .skip(4)
        .find_map(|(i, l)| l.split_once(",-[").map(|(_, rest)| (i, rest)))
        .ok_or_else(|| ParseFailure::unrecognized(F, "no ,-[ location marker"))?;
    let location = marker
        .split(']')
        .next()
        .ok_or_else(|| ParseFailure::unrecognized(F, "unterminated location marker"))?;
    let (path, line, column) = split_location(F, location)?;

    let mut message = swc_message(message);
    if message.is_empty() {
        message = lines[4..marker_index]
            .iter()
            .map(|l| swc_message(l))
            .find(|l| !l.is_empty())
            .unwrap_or_default();
    }
    ErrorRecord::from_one_based(F, path, line, column, message)
}

/// Drop the SWC `x`/`×` bullet in front of a message.
fn swc_message(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix("x ")
        .or_else(|| text.strip_prefix('×'))
        .unwrap_or(text)
        .trim()
}

/// ```text
/// (any first line)
/// src/app/app.component.ts
///   12:5  Error: Unexpected any. Specify a different type
/// ```
fn parse_lint_style(lines: &[&str]) -> ParseResult<ErrorRecord> {
    const F: BuildFormat = BuildFormat::LintStyle;
    let path = line_at(lines, 1, F)?.trim();
    let detail = line_at(lines, 2, F)?.trim();
    let (coords, message) = detail
        .split_once("Error:")
        .ok_or_else(|| ParseFailure::unrecognized(F, "line 2 has no Error: label"))?;
    let (line, column) = coords
        .trim()
        .split_once(':')
        .ok_or_else(|| ParseFailure::unrecognized(F, "expected line:col before Error:"))?;
    ErrorRecord::from_one_based(
        F,
        path,
        parse_number(F, "line", line)?,
        parse_number(F, "column", column)?,
        message,
    )
}

/// ```text
/// ✘ [ERROR] TS2304: Cannot find name 'foo'. [plugin angular-compiler]
/// (continuation)
///
///     src/app/app.component.ts:12:4:
/// ```
fn parse_esbuild(lines: &[&str]) -> ParseResult<ErrorRecord> {
    const F: BuildFormat = BuildFormat::Esbuild;
    let first = line_at(lines, 0, F)?;
    let second = lines.get(1).copied().unwrap_or_default();
    let (path, line, column) = split_location(F, line_at(lines, 3, F)?)?;

    let message = format!("{} {}", esbuild_message(first), second.trim());
    ErrorRecord::from_one_based(F, path, line, column, &message)
}

/// Message text of a `✘ [ERROR]` header line without the label, code, or
/// plugin tag.
pub(crate) fn esbuild_message(header: &str) -> String {
    let text = header.trim();
    let text = text.strip_prefix("✘ [ERROR]").unwrap_or(text);
    let text = PLUGIN_TAG.replace(text, "");
    strip_code_label(&text).to_string()
}
