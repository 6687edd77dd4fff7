//! Parse failure taxonomy
//!
//! Recognizers return [`ParseResult`]. A failure only means "no record for
//! this candidate"; it never reaches the caller of
//! [`extract_errors`](crate::extract_errors).

use crate::record::BuildFormat;
use thiserror::Error;

/// Result type for a single recognizer
pub type ParseResult<T> = Result<T, ParseFailure>;

/// Why a candidate produced no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// The cheap shape predicate did not match
    #[error("{format}: input does not look like this format")]
    NoMatch { format: BuildFormat },

    /// A header matched but the rest of the candidate did not have the
    /// expected shape
    #[error("{format}: unrecognized shape ({reason})")]
    UnrecognizedFormat {
        format: BuildFormat,
        reason: &'static str,
    },

    /// A line or column field was not numeric
    #[error("{format}: {field} is not a number: {token:?}")]
    PartialMatch {
        format: BuildFormat,
        field: &'static str,
        token: String,
    },

    /// The uri or message was empty after trimming
    #[error("{format}: empty {field}")]
    EmptyField {
        format: BuildFormat,
        field: &'static str,
    },
}

impl ParseFailure {
    pub(crate) fn unrecognized(format: BuildFormat, reason: &'static str) -> Self {
        Self::UnrecognizedFormat { format, reason }
    }

    /// The format whose recognizer failed
    pub fn format(&self) -> BuildFormat {
        match self {
            Self::NoMatch { format }
            | Self::UnrecognizedFormat { format, .. }
            | Self::PartialMatch { format, .. }
            | Self::EmptyField { format, .. } => *format,
        }
    }
}
