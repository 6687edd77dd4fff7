//! ANSI escape code removal
//!
//! Build tools colorize paths, line numbers and severity labels. Every
//! recognizer matches on plain text, so captured output goes through
//! [`strip_ansi`] before any substring or number extraction.

use regex::Regex;
use std::sync::LazyLock;

/// CSI sequences (`ESC [` or the single-byte `\u{9b}` introducer, parameter
/// bytes, intermediate bytes, one final byte), two-character ESC sequences,
/// and any stray introducer left over.
static ANSI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\x1b\[|\x{9b})[0-?]*[ -/]*[@-~]|\x1b[@-Z\\-_]|[\x1b\x{9b}]")
        .expect("ANSI pattern is a valid regex")
});

/// Remove ANSI escape sequences from `text`.
///
/// The output never contains an escape introducer, so applying the function
/// twice gives the same result as applying it once.
pub fn strip_ansi(text: &str) -> String {
    if !contains_ansi(text) {
        return text.to_string();
    }
    ANSI_PATTERN.replace_all(text, "").into_owned()
}

/// Whether `text` contains an escape introducer.
pub fn contains_ansi(text: &str) -> bool {
    text.contains(['\u{1b}', '\u{9b}'])
}
