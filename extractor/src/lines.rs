//! Line-oriented scanners
//!
//! One top-to-bottom pass over the log lines. Every line is offered to every
//! format, so one line can feed more than one of them. Two-line formats keep
//! their own pending header slot: a header sets the slot, and the next line
//! reads and clears it whether or not a record comes out.
//!
//! | Format | Header | Continuation |
//! |--------|--------|--------------|
//! | ESLint | line ending in `.ts`/`.tsx` | `<line>:<col>  error <message>`, repeated |
//! | CRA | `TypeScript error in <path>(<line>,<col>):` | message line |
//! | Vite-colon | `<path>(<line>,<col>): error <code>: <message>` | (single line) |
//! | Vue/TS | `error  in <path>:<line>:<col>` | next non-blank line |
//! | Syntax error | `SyntaxError: <path>: <message> (<line>:<col>)` | (single line) |
//! | Java | `<path>:<line>: error: <message>` under the project folder | appended line |
//! | Jasmine | `Error: <message>` outside the project folder | `at ... (<path>:<line>:<col>)` |
//! | Vue | line ending in `.vue` | same as ESLint |

use crate::config::ExtractorConfig;
use crate::error::{ParseFailure, ParseResult};
use crate::record::{BuildFormat, Diagnostic, ErrorRecord};
use crate::token::{last_paren_group, parse_number, split_location, strip_code_label};
use regex::Regex;
use std::sync::LazyLock;

/// `13:1  error Unexpected console statement`
static LINT_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d+)\s+(?:error|warning)\s+(.+)$")
        .expect("lint entry pattern is a valid regex")
});

/// `  TS2322` code trailing a react-scripts message
static TRAILING_TS_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+TS\d+$").expect("trailing code pattern is a valid regex"));

const CRA_PREFIX: &str = "TypeScript error in ";
const VUE_TS_MARKER: &str = "error  in ";

/// Pending state for a single scan. Created per call, never shared.
pub(crate) struct LineScanner<'a> {
    folder: &'a str,
    config: &'a ExtractorConfig,
    eslint_file: Option<String>,
    cra_header: Option<String>,
    vue_ts_header: Option<String>,
    java_header: Option<String>,
    /// Already-shortened message of the pending Jasmine error
    jasmine_message: Option<String>,
    vue_file: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> LineScanner<'a> {
    pub(crate) fn new(folder: &'a str, config: &'a ExtractorConfig) -> Self {
        Self {
            folder,
            config,
            eslint_file: None,
            cra_header: None,
            vue_ts_header: None,
            java_header: None,
            jasmine_message: None,
            vue_file: None,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn feed(&mut self, line: &str) {
        let trimmed = line.trim();

        // ESLint stylish output for TypeScript files
        if let Some(file) = self.eslint_file.take() {
            if self.push(lint_entry(BuildFormat::Eslint, &file, trimmed)) {
                self.eslint_file = Some(file);
            }
        }
        if trimmed.ends_with(".ts") || trimmed.ends_with(".tsx") {
            self.eslint_file = Some(trimmed.to_string());
        }

        // react-scripts
        if let Some(header) = self.cra_header.take() {
            self.push(cra_error(&header, trimmed));
        }
        if trimmed.starts_with(CRA_PREFIX) {
            self.cra_header = Some(trimmed.to_string());
        }

        // vite / vue-tsc / tsc --pretty false
        if line.contains(": error ") {
            self.push(vite_colon_error(line));
        }

        // vue-cli
        if let Some(header) = self.vue_ts_header.take() {
            if trimmed.is_empty() {
                self.vue_ts_header = Some(header);
            } else {
                self.push(vue_ts_error(&header, trimmed));
            }
        }
        if line.to_ascii_lowercase().contains(VUE_TS_MARKER) {
            self.vue_ts_header = Some(line.to_string());
        }

        // babel via react-scripts
        if trimmed.starts_with("SyntaxError:") {
            self.push(syntax_error(trimmed));
        }

        // javac / gradle
        if let Some(header) = self.java_header.take() {
            self.push(java_error(&header, line));
        }
        let in_folder = !self.folder.is_empty() && line.contains(self.folder);
        if in_folder && line.contains("error:") {
            self.java_header = Some(line.to_string());
        }

        // jasmine / karma
        if let Some(message) = self.jasmine_message.take() {
            self.push(jasmine_error(&message, line));
        }
        if !in_folder {
            if let Some((_, message)) = line.split_once("Error:") {
                self.jasmine_message = Some(shorten(strip_code_label(message), self.config));
            }
        }

        // ESLint stylish output for Vue single-file components
        if let Some(file) = self.vue_file.take() {
            if self.push(lint_entry(BuildFormat::Vue, &file, trimmed)) {
                self.vue_file = Some(file);
            }
        }
        if trimmed.ends_with(".vue") {
            self.vue_file = Some(trimmed.to_string());
        }
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Record a successful parse; returns whether one was recorded.
    fn push(&mut self, result: ParseResult<Diagnostic>) -> bool {
        match result {
            Ok(diagnostic) => {
                self.diagnostics.push(diagnostic);
                true
            }
            Err(failure) => {
                tracing::trace!(%failure, "Line candidate dropped");
                false
            }
        }
    }
}

/// Run every line scanner over `lines`.
pub(crate) fn scan<S: AsRef<str>>(
    lines: &[S],
    folder: &str,
    config: &ExtractorConfig,
) -> Vec<Diagnostic> {
    let mut scanner = LineScanner::new(folder, config);
    for line in lines {
        scanner.feed(line.as_ref());
    }
    scanner.finish()
}

fn tagged(format: BuildFormat, record: ErrorRecord) -> Diagnostic {
    Diagnostic::new(format, record)
}

/// `13:1  error Unexpected console statement` under a remembered file name.
/// Shared by the `.ts` and `.vue` scanners, which keep separate file slots.
fn lint_entry(format: BuildFormat, file: &str, line: &str) -> ParseResult<Diagnostic> {
    let caps = LINT_ENTRY
        .captures(line)
        .ok_or(ParseFailure::NoMatch { format })?;
    let record = ErrorRecord::from_one_based(
        format,
        file,
        parse_number(format, "line", &caps[1])?,
        parse_number(format, "column", &caps[2])?,
        &caps[3],
    )?;
    Ok(tagged(format, record))
}

/// `TypeScript error in /app/src/App.tsx(7,3):` then the message line.
fn cra_error(header: &str, message: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::CraTypescript;
    let rest = header
        .strip_prefix(CRA_PREFIX)
        .ok_or(ParseFailure::NoMatch { format: F })?
        .trim()
        .trim_end_matches(':');
    let (open, coords) =
        last_paren_group(rest).ok_or_else(|| ParseFailure::unrecognized(F, "no (line,col)"))?;
    let (line, column) = line_col(F, coords, ',')?;
    let message = TRAILING_TS_CODE.replace(message, "");
    let record = ErrorRecord::from_one_based(F, &rest[..open], line, column, &message)?;
    Ok(tagged(F, record))
}

/// `src/main.ts(5,3): error TS2304: Cannot find name 'foo'.`
fn vite_colon_error(line: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::ViteColon;
    let (location, message) = line
        .split_once(": error ")
        .ok_or(ParseFailure::NoMatch { format: F })?;
    let location = location.trim();
    let (open, coords) = last_paren_group(location)
        .ok_or_else(|| ParseFailure::unrecognized(F, "no (line,col) before error"))?;
    let (line, column) = line_col(F, coords, ',')?;
    let record =
        ErrorRecord::from_one_based(F, &location[..open], line, column, strip_code_label(message))?;
    Ok(tagged(F, record))
}

/// ` ERROR  in /app/src/main.ts:5:1` then the next non-blank line.
fn vue_ts_error(header: &str, message: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::VueTypescript;
    let start = header
        .to_ascii_lowercase()
        .find(VUE_TS_MARKER)
        .ok_or(ParseFailure::NoMatch { format: F })?
        + VUE_TS_MARKER.len();
    let (path, line, column) = split_location(F, &header[start..])?;
    let record = ErrorRecord::from_one_based(F, path, line, column, strip_code_label(message))?;
    Ok(tagged(F, record))
}

/// `SyntaxError: /app/src/App.js: Unexpected token (12:5)`
fn syntax_error(line: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::SyntaxError;
    let rest = line
        .strip_prefix("SyntaxError:")
        .ok_or(ParseFailure::NoMatch { format: F })?;
    let (path, detail) = rest
        .split_once(':')
        .ok_or_else(|| ParseFailure::unrecognized(F, "no path before message"))?;
    let (open, coords) =
        last_paren_group(detail).ok_or_else(|| ParseFailure::unrecognized(F, "no (line:col)"))?;
    let (line, column) = line_col(F, coords, ':')?;
    let record = ErrorRecord::from_one_based(F, path, line, column, &detail[..open])?;
    Ok(tagged(F, record))
}

/// `/proj/android/app/src/main/java/App.java:12: error: cannot find symbol`
/// with the following line appended to the message.
fn java_error(header: &str, next: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::Java;
    let (location, message) = header
        .split_once(" error: ")
        .ok_or_else(|| ParseFailure::unrecognized(F, "no \" error: \" separator"))?;
    let (path, line) = location
        .trim()
        .trim_end_matches(':')
        .rsplit_once(':')
        .ok_or_else(|| ParseFailure::unrecognized(F, "expected path:line"))?;
    let line = parse_number(F, "line", line)?;
    let message = format!("{} {}", message.trim(), next.trim());
    let record = ErrorRecord::from_zero_based(F, path, line.saturating_sub(1), 0, &message)?;
    Ok(tagged(F, record))
}

/// Stack frame following an `Error:` line:
/// `at UserContext.<anonymous> (src/app/app.component.spec.ts:23:22)`.
fn jasmine_error(message: &str, frame: &str) -> ParseResult<Diagnostic> {
    const F: BuildFormat = BuildFormat::Jasmine;
    if frame.contains("<Jasmine>") {
        return Err(ParseFailure::unrecognized(F, "frame is inside jasmine itself"));
    }
    let (_, location) =
        last_paren_group(frame).ok_or_else(|| ParseFailure::unrecognized(F, "no (path:line:col)"))?;
    let (path, line, column) = split_location(F, location)?;
    let record = ErrorRecord::from_one_based(F, path, line, column, message)?;
    Ok(tagged(F, record))
}

/// `7,3` or `12:5`
fn line_col(format: BuildFormat, coords: &str, separator: char) -> ParseResult<(usize, usize)> {
    let (line, column) = coords
        .split_once(separator)
        .ok_or_else(|| ParseFailure::unrecognized(format, "expected line and column"))?;
    Ok((
        parse_number(format, "line", line)?,
        parse_number(format, "column", column)?,
    ))
}

/// Keep the head and tail of an over-long message.
fn shorten(message: &str, config: &ExtractorConfig) -> String {
    let message = message.trim();
    let count = message.chars().count();
    if count <= config.jasmine_max_message {
        return message.to_string();
    }
    let head: String = message.chars().take(config.jasmine_head).collect();
    let tail: String = message
        .chars()
        .skip(count.saturating_sub(config.jasmine_tail))
        .collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOLDER: &str = "/Users/dev/myapp";

    fn run(lines: &[&str]) -> Vec<Diagnostic> {
        scan(lines, FOLDER, &ExtractorConfig::default())
    }

    fn only(lines: &[&str]) -> Diagnostic {
        let mut found = run(lines);
        assert_eq!(found.len(), 1, "expected one record, got {:?}", found);
        found.remove(0)
    }

    #[test]
    fn test_eslint_single_entry() {
        let d = only(&["src/app/app.component.ts", "13:1  error Unexpected console statement"]);
        assert_eq!(d.format, BuildFormat::Eslint);
        assert_eq!(d.record.uri, "src/app/app.component.ts");
        assert_eq!((d.record.line, d.record.position), (12, 0));
        assert_eq!(d.record.error, "Unexpected console statement");
    }

    #[test]
    fn test_eslint_multiple_entries_and_warnings() {
        let found = run(&[
            "/Users/dev/myapp/src/app/home.page.tsx",
            "  4:10  error    'x' is assigned a value but never used",
            "  9:3   warning  Unexpected any",
            "",
            "  12:1  error  not attached to a file any more",
        ]);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].record.line, 3);
        assert_eq!(found[1].record.error, "Unexpected any");
        assert!(found.iter().all(|d| d.format == BuildFormat::Eslint));
    }

    #[test]
    fn test_vue_file_entries() {
        let d = only(&[
            "src/components/HelloWorld.vue",
            "  7:5  error  Missing key  vue/require-v-for-key",
        ]);
        assert_eq!(d.format, BuildFormat::Vue);
        assert_eq!(d.record.uri, "src/components/HelloWorld.vue");
        assert_eq!((d.record.line, d.record.position), (6, 4));
    }

    #[test]
    fn test_cra_typescript() {
        let d = only(&[
            "TypeScript error in /app/src/App.tsx(7,3):",
            "Type 'string' is not assignable to type 'number'.  TS2322",
        ]);
        assert_eq!(d.format, BuildFormat::CraTypescript);
        assert_eq!(d.record.uri, "/app/src/App.tsx");
        assert_eq!((d.record.line, d.record.position), (6, 2));
        assert_eq!(d.record.error, "Type 'string' is not assignable to type 'number'.");
    }

    #[test]
    fn test_cra_header_cleared_after_one_line() {
        let lines = ["TypeScript error in /app/src/App.tsx(7,3):", "", "late message"];
        assert!(run(&lines).is_empty());
    }

    #[test]
    fn test_vite_colon() {
        let d = only(&["src/main.ts(5,3): error TS2304: Cannot find name 'foo'."]);
        assert_eq!(d.format, BuildFormat::ViteColon);
        assert_eq!(d.record.uri, "src/main.ts");
        assert_eq!((d.record.line, d.record.position), (4, 2));
        assert_eq!(d.record.error, "Cannot find name 'foo'.");
    }

    #[test]
    fn test_vite_colon_without_coordinates_dropped() {
        assert!(run(&["vite: error building bundle"]).is_empty());
    }

    #[test]
    fn test_vue_ts_skips_blank_lines() {
        let d = only(&[" ERROR  in src/main.ts:5:1", "", "TS2304: Cannot find name 'x'."]);
        assert_eq!(d.format, BuildFormat::VueTypescript);
        assert_eq!(d.record.uri, "src/main.ts");
        assert_eq!((d.record.line, d.record.position), (4, 0));
        assert_eq!(d.record.error, "Cannot find name 'x'.");
    }

    #[test]
    fn test_syntax_error() {
        let d = only(&["SyntaxError: /app/src/App.js: Unexpected token, expected \",\" (12:5)"]);
        assert_eq!(d.format, BuildFormat::SyntaxError);
        assert_eq!(d.record.uri, "/app/src/App.js");
        assert_eq!((d.record.line, d.record.position), (11, 4));
        assert_eq!(d.record.error, "Unexpected token, expected \",\"");
    }

    #[test]
    fn test_java_error_appends_next_line() {
        let d = only(&[
            "/Users/dev/myapp/android/app/src/main/java/io/app/MainActivity.java:12: error: cannot find symbol",
            "    Foo bar = null;",
        ]);
        assert_eq!(d.format, BuildFormat::Java);
        assert_eq!(
            d.record.uri,
            "/Users/dev/myapp/android/app/src/main/java/io/app/MainActivity.java"
        );
        assert_eq!((d.record.line, d.record.position), (11, 0));
        assert_eq!(d.record.error, "cannot find symbol Foo bar = null;");
    }

    #[test]
    fn test_java_continuation_keeps_inner_layout() {
        let d = only(&[
            "/Users/dev/myapp/android/app/src/main/java/io/app/Plugin.java:30: error: ')' expected",
            "        call(a,   b  ;\t",
        ]);
        assert_eq!(d.record.error, "')' expected call(a,   b  ;");
    }

    #[test]
    fn test_java_requires_folder() {
        let found = scan(
            &["/elsewhere/App.java:12: error: cannot find symbol", "ctx"],
            FOLDER,
            &ExtractorConfig::default(),
        );
        assert!(found.iter().all(|d| d.format != BuildFormat::Java));
    }

    #[test]
    fn test_jasmine_error_with_frame() {
        let d = only(&[
            "\tError: Expected 1 to be 2.",
            "\t    at UserContext.<anonymous> (src/app/app.component.spec.ts:23:22)",
        ]);
        assert_eq!(d.format, BuildFormat::Jasmine);
        assert_eq!(d.record.uri, "src/app/app.component.spec.ts");
        assert_eq!((d.record.line, d.record.position), (22, 21));
        assert_eq!(d.record.error, "Expected 1 to be 2.");
    }

    #[test]
    fn test_jasmine_internal_frame_dropped() {
        assert!(run(&["Error: Expected 1 to be 2.", "    at <Jasmine>"]).is_empty());
    }

    #[test]
    fn test_jasmine_long_message_shortened() {
        let long = format!("Error: {}", "a".repeat(90) + &"b".repeat(30));
        let lines = [long.as_str(), "at x (src/a.spec.ts:1:1)"];
        let d = only(&lines);
        let expected = format!("{}...{}", "a".repeat(80), "b".repeat(16));
        assert_eq!(d.record.error, expected);
    }

    #[test]
    fn test_jasmine_skipped_for_folder_lines() {
        let found = run(&["Error: /Users/dev/myapp/src/x.ts broke", "at y (src/a.ts:1:1)"]);
        assert!(found.iter().all(|d| d.format != BuildFormat::Jasmine));
    }

    #[test]
    fn test_shorten_respects_config() {
        let config = ExtractorConfig {
            jasmine_max_message: 5,
            jasmine_head: 2,
            jasmine_tail: 1,
            ..Default::default()
        };
        assert_eq!(shorten("abcdefg", &config), "ab...g");
        assert_eq!(shorten("abcde", &config), "abcde");
    }

    #[test]
    fn test_no_records_from_plain_output() {
        assert!(run(&["Build succeeded", "All good"]).is_empty());
    }

    #[test]
    fn test_scanners_are_independent_per_call() {
        let first = run(&["src/a.ts"]);
        assert!(first.is_empty());
        // a fresh call does not remember the file from the previous one
        assert!(run(&["13:1  error Unexpected console statement"]).is_empty());
    }
}
