//! Fallback whole-text pass
//!
//! Runs only when no earlier phase found anything. It recognizes a few more
//! shapes in a single sequential scan:
//!
//! - `Error: <path>:<line>:<col> - ...` lines
//! - `tsc` batch lines, `<path>:<line>:<col> - error TS1234: <message>`
//! - Jest `FAIL <path>` followed by a `● <test title>` line
//! - `✘ [ERROR] <message>` with the location exactly two lines below

use crate::blob::esbuild_message;
use crate::error::{ParseFailure, ParseResult};
use crate::record::{BuildFormat, Diagnostic, ErrorRecord};
use crate::token::{leading_number, split_location, strip_code_label};
use regex::Regex;
use std::collections::VecDeque;
use std::sync::LazyLock;

/// Duration Jest appends to slow suites: `FAIL src/a.test.ts (5.2 s)`
static JEST_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(\d+(?:\.\d+)?\s*m?s\)$").expect("jest timing pattern is a valid regex")
});

const ESBUILD_HEADER: &str = "✘ [ERROR] ";
/// Distance from a `✘ [ERROR]` header to its location line
const ESBUILD_LOOKAHEAD: usize = 2;

/// Per-call scanner state
#[derive(Default)]
pub(crate) struct FallbackScanner {
    index: usize,
    /// Jest suite path waiting for its test title
    jest_path: Option<String>,
    /// `(line index of the location, header message)` for armed ESBuild blocks
    esbuild_blocks: VecDeque<(usize, String)>,
    diagnostics: Vec<Diagnostic>,
}

impl FallbackScanner {
    pub(crate) fn feed(&mut self, line: &str) {
        let index = self.index;
        self.index += 1;

        while let Some((target, message)) = self.esbuild_blocks.front() {
            if *target != index {
                break;
            }
            let result = vite_block_error(message, line);
            self.esbuild_blocks.pop_front();
            self.push(result);
        }

        if line.starts_with("Error: ") {
            self.push(generic_error(line));
        } else if line.contains("- error TS") {
            self.push(typescript_batch_error(line));
        }

        let is_fail = line.starts_with("FAIL ");
        if let Some(path) = self.jest_path.take() {
            if line.trim().is_empty() {
                self.jest_path = Some(path);
            } else if !is_fail {
                self.push(jest_error(&path, line));
            }
        }
        if is_fail {
            let suite = line["FAIL ".len()..].trim();
            self.jest_path = Some(JEST_TIMING.replace(suite, "").into_owned());
        }

        if line.starts_with(ESBUILD_HEADER) {
            self.esbuild_blocks
                .push_back((index + ESBUILD_LOOKAHEAD, esbuild_message(line)));
        }
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn push(&mut self, result: ParseResult<Diagnostic>) {
        match result {
            Ok(diagnostic) => self.diagnostics.push(diagnostic),
            Err(failure) => tracing::trace!(%failure, "Fallback candidate dropped"),
        }
    }
}

/// Run the fallback pass over `lines`.
pub(crate) fn scan<S: AsRef<str>>(lines: &[S]) -> Vec<Diagnostic> {
    let mut scanner = FallbackScanner::default();
    for line in lines {
        scanner.feed(line.as_ref());
    }
    scanner.finish()
}

/// `Error: src/app/x.ts:12:5 - error TS2304: Cannot find name 'y'.`
///
/// Path is everything up to the first colon after the label; line and column
/// are the third and fourth colon-separated tokens of the whole line. The
/// message follows the second ` - ` (or the first, when there is only one).
fn generic_error(line: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::GenericError;
    let rest = line
        .strip_prefix("Error: ")
        .ok_or(ParseFailure::NoMatch { format: F })?;
    let path = rest.split(':').next().unwrap_or_default();

    let tokens: Vec<&str> = line.split(':').collect();
    if tokens.len() < 4 {
        return Err(ParseFailure::unrecognized(F, "expected path:line:col"));
    }
    let row = leading_number(F, "line", tokens[2])?;
    let column = leading_number(F, "column", tokens[3])?;

    let mut segments = line.splitn(3, " - ").skip(1);
    let first = segments
        .next()
        .ok_or_else(|| ParseFailure::unrecognized(F, "no \" - \" before message"))?;
    let message = segments.next().unwrap_or(first);

    let record = ErrorRecord::from_one_based(F, path, row, column, strip_code_label(message))?;
    Ok(Diagnostic::new(F, record))
}

/// `src/app/app.module.ts:18:3 - error TS2391: Function implementation is missing.`
fn typescript_batch_error(line: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::TypescriptBatch;
    let idx = line
        .find("- error TS")
        .ok_or(ParseFailure::NoMatch { format: F })?;
    let (path, row, column) = split_location(F, &line[..idx])?;
    let message = strip_code_label(&line[idx + 2..]);
    let record = ErrorRecord::from_one_based(F, path, row, column, message)?;
    Ok(Diagnostic::new(F, record))
}

/// `FAIL src/counter.test.ts` then `  ● adds 1 + 2 to equal 3`
fn jest_error(path: &str, title: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::Jest;
    let title = title.trim();
    let message = title.strip_prefix('●').unwrap_or(title);
    let record = ErrorRecord::from_zero_based(F, path, 0, 0, message)?;
    Ok(Diagnostic::new(F, record))
}

/// Location line of a `✘ [ERROR]` block: `    src/main.ts:3:7:`
fn vite_block_error(message: &str, location: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::ViteBlock;
    let (path, row, column) = split_location(F, location)?;
    let record = ErrorRecord::from_one_based(F, path, row, column, message)?;
    Ok(Diagnostic::new(F, record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(lines: &[&str]) -> Vec<ErrorRecord> {
        scan(lines).into_iter().map(|d| d.record).collect()
    }

    #[test]
    fn test_typescript_batch() {
        let found = scan(&[
            "src/app/app.module.ts:18:3 - error TS2391: Function implementation is missing.",
        ]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].format, BuildFormat::TypescriptBatch);
        let r = &found[0].record;
        assert_eq!(r.uri, "src/app/app.module.ts");
        assert_eq!((r.line, r.position), (17, 2));
        assert_eq!(r.error, "Function implementation is missing.");
    }

    #[test]
    fn test_generic_error_two_separators() {
        let r = records(&[
            "Error: src/app/home.page.ts:12:5 - error NG8001 - 'ion-foo' is not a known element",
        ]);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].uri, "src/app/home.page.ts");
        assert_eq!((r[0].line, r[0].position), (11, 4));
        assert_eq!(r[0].error, "'ion-foo' is not a known element");
    }

    #[test]
    fn test_generic_error_single_separator() {
        let r = records(&["Error: src/app/x.ts:3:9 - error TS2304: Cannot find name 'y'."]);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].error, "Cannot find name 'y'.");
        assert_eq!((r[0].line, r[0].position), (2, 8));
    }

    #[test]
    fn test_generic_error_without_location_dropped() {
        assert!(records(&["Error: Cannot find module 'foo'"]).is_empty());
    }

    #[test]
    fn test_jest_pairs_with_next_line() {
        let r = records(&["FAIL src/counter.test.ts", "  ● adds 1 + 2 to equal 3"]);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].uri, "src/counter.test.ts");
        assert_eq!((r[0].line, r[0].position), (0, 0));
        assert_eq!(r[0].error, "adds 1 + 2 to equal 3");
    }

    #[test]
    fn test_jest_skips_blank_and_replaces_on_new_fail() {
        let r = records(&[
            "FAIL src/a.test.ts",
            "FAIL src/b.test.ts",
            "",
            "  ● Counter › starts at zero",
        ]);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].uri, "src/b.test.ts");
        assert_eq!(r[0].error, "Counter › starts at zero");
    }

    #[test]
    fn test_jest_timing_suffix_not_in_path() {
        let r = records(&["FAIL src/a.test.ts (5.2 s)", "  ● slow suite fails"]);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].uri, "src/a.test.ts");

        let r = records(&["FAIL src/b.test.ts (812 ms)", "  ● fast suite fails"]);
        assert_eq!(r[0].uri, "src/b.test.ts");
    }

    #[test]
    fn test_vite_block() {
        let found = scan(&[
            "✘ [ERROR] Could not resolve \"./missing\"",
            "",
            "    src/main.ts:3:7:",
            "      3 │ import x from './missing'",
        ]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].format, BuildFormat::ViteBlock);
        assert_eq!(found[0].record.uri, "src/main.ts");
        assert_eq!((found[0].record.line, found[0].record.position), (2, 6));
        assert_eq!(found[0].record.error, "Could not resolve \"./missing\"");
    }

    #[test]
    fn test_vite_block_location_must_be_two_lines_below() {
        assert!(scan(&["✘ [ERROR] Could not resolve \"x\"", "    src/main.ts:3:7:"]).is_empty());
    }

    #[test]
    fn test_records_in_encounter_order() {
        let r = records(&[
            "FAIL src/a.test.ts",
            "  ● one",
            "src/b.ts:1:1 - error TS1005: ';' expected.",
        ]);
        let uris: Vec<&str> = r.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, vec!["src/a.test.ts", "src/b.ts"]);
    }
}
