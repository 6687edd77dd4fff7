//! Small text helpers shared by the recognizers.

use crate::error::{ParseFailure, ParseResult};
use crate::record::BuildFormat;
use regex::Regex;
use std::sync::LazyLock;

/// Leading diagnostic code label such as `TS2304:`, `NG8001:` or
/// `error TS2391:`.
static CODE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:error\s+)?[A-Z]{2,}\d+:\s*").expect("code label pattern is a valid regex")
});

/// Parse a whole (trimmed) token as a number.
pub(crate) fn parse_number(
    format: BuildFormat,
    field: &'static str,
    token: &str,
) -> ParseResult<usize> {
    token
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseFailure::PartialMatch {
            format,
            field,
            token: token.to_string(),
        })
}

/// Parse the digits at the start of a token, ignoring whatever follows
/// (`"3 - error TS2391"` gives `3`).
pub(crate) fn leading_number(
    format: BuildFormat,
    field: &'static str,
    token: &str,
) -> ParseResult<usize> {
    let trimmed = token.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    parse_number(format, field, &trimmed[..end])
}

/// Split `path:line:col` from the right, so drive letters and colons inside
/// the path survive. A trailing colon is tolerated.
pub(crate) fn split_location(format: BuildFormat, text: &str) -> ParseResult<(&str, usize, usize)> {
    let text = text.trim().trim_end_matches(':');
    let mut parts = text.rsplitn(3, ':');
    let column = parts.next();
    let line = parts.next();
    let path = parts.next();
    match (path, line, column) {
        (Some(path), Some(line), Some(column)) => Ok((
            path.trim(),
            parse_number(format, "line", line)?,
            parse_number(format, "column", column)?,
        )),
        _ => Err(ParseFailure::unrecognized(format, "expected path:line:col")),
    }
}

/// The last `( ... )` group in `text`: byte offset of the opening paren and
/// the text inside.
pub(crate) fn last_paren_group(text: &str) -> Option<(usize, &str)> {
    let close = text.rfind(')')?;
    let open = text[..close].rfind('(')?;
    Some((open, &text[open + 1..close]))
}

/// Drop a leading diagnostic code label from a message.
pub(crate) fn strip_code_label(message: &str) -> &str {
    let message = message.trim();
    match CODE_LABEL.find(message) {
        Some(m) => &message[m.end()..],
        None => message,
    }
}
