//! Error record model
//!
//! [`ErrorRecord`] is the shape every recognizer produces. Coordinates are
//! always zero-based; tools print one-based numbers, and the conversion happens
//! once, in [`ErrorRecord::from_one_based`].

use crate::error::{ParseFailure, ParseResult};
use serde::{Deserialize, Serialize};

/// One diagnosable build problem at an editor-ready location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// File path, absolute or relative to the project root
    pub uri: String,
    /// Zero-based line number
    pub line: usize,
    /// Zero-based column number
    pub position: usize,
    /// Human-readable message without ANSI codes
    pub error: String,
}

impl ErrorRecord {
    /// Build a record from one-based tool coordinates.
    ///
    /// Fails when the trimmed uri or message is empty. A source value of `0`
    /// stays `0`.
    pub fn from_one_based(
        format: BuildFormat,
        uri: &str,
        line: usize,
        column: usize,
        error: &str,
    ) -> ParseResult<Self> {
        Self::from_zero_based(
            format,
            uri,
            line.saturating_sub(1),
            column.saturating_sub(1),
            error,
        )
    }

    /// Build a record from coordinates that are already zero-based.
    pub fn from_zero_based(
        format: BuildFormat,
        uri: &str,
        line: usize,
        position: usize,
        error: &str,
    ) -> ParseResult<Self> {
        let uri = uri.trim();
        let error = error.trim();
        if uri.is_empty() {
            return Err(ParseFailure::EmptyField { format, field: "uri" });
        }
        if error.is_empty() {
            return Err(ParseFailure::EmptyField {
                format,
                field: "error",
            });
        }
        Ok(Self {
            uri: uri.to_string(),
            line,
            position,
            error: error.to_string(),
        })
    }

    /// `uri:line:col` with one-based coordinates, as editors and terminals
    /// print locations.
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.uri, self.line + 1, self.position + 1)
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location(), self.error)
    }
}

/// Which recognizer produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildFormat {
    /// Next.js "Failed to compile." block with a `,-[path:line:col]` marker
    NextJs,
    /// Bare path line followed by `<line>:<col>  Error: <message>`
    LintStyle,
    /// ESBuild / Angular esbuild plugin `✘ [ERROR]` block
    Esbuild,
    /// Xcode / Swift compiler diagnostics
    Xcode,
    /// ESLint stylish reporter (`.ts`/`.tsx` file header)
    Eslint,
    /// react-scripts `TypeScript error in ...`
    CraTypescript,
    /// `<path>(<line>,<col>): error TS...`
    ViteColon,
    /// Vue CLI `error  in <path>:<line>:<col>`
    VueTypescript,
    /// Babel `SyntaxError: <path>: <message> (<line>:<col>)`
    SyntaxError,
    /// javac / Gradle `<path>:<line>: error: <message>`
    Java,
    /// Jasmine / Karma stack trace
    Jasmine,
    /// ESLint stylish reporter (`.vue` file header)
    Vue,
    /// `Error: <path>:<line>:<col> - ...`
    GenericError,
    /// `tsc` batch output `<path>:<line>:<col> - error TS...`
    TypescriptBatch,
    /// Jest `FAIL <path>` followed by a `●` test title
    Jest,
    /// Vite / ESBuild three-line `✘ [ERROR]` block inside longer output
    ViteBlock,
}

impl std::fmt::Display for BuildFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NextJs => write!(f, "next_js"),
            Self::LintStyle => write!(f, "lint_style"),
            Self::Esbuild => write!(f, "esbuild"),
            Self::Xcode => write!(f, "xcode"),
            Self::Eslint => write!(f, "eslint"),
            Self::CraTypescript => write!(f, "cra_typescript"),
            Self::ViteColon => write!(f, "vite_colon"),
            Self::VueTypescript => write!(f, "vue_typescript"),
            Self::SyntaxError => write!(f, "syntax_error"),
            Self::Java => write!(f, "java"),
            Self::Jasmine => write!(f, "jasmine"),
            Self::Vue => write!(f, "vue"),
            Self::GenericError => write!(f, "generic_error"),
            Self::TypescriptBatch => write!(f, "typescript_batch"),
            Self::Jest => write!(f, "jest"),
            Self::ViteBlock => write!(f, "vite_block"),
        }
    }
}

/// An error record tagged with the recognizer that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub format: BuildFormat,
    #[serde(flatten)]
    pub record: ErrorRecord,
}

impl Diagnostic {
    pub fn new(format: BuildFormat, record: ErrorRecord) -> Self {
        Self { format, record }
    }
}
