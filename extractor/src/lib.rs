//! Build Error Extractor
//!
//! Turns the raw console output of a failed build into an ordered list of
//! `(file, line, column, message)` records that an editor can step through.
//!
//! Recognized tools:
//! - TypeScript (`tsc` batch and pretty output, react-scripts, vue-tsc)
//! - ESLint stylish reporter (`.ts`, `.tsx`, `.vue`)
//! - ESBuild / Angular, Vite
//! - Next.js (SWC)
//! - Babel syntax errors
//! - Jest, Jasmine / Karma
//! - javac / Gradle
//! - Swift / Xcode
//!
//! # Usage
//!
//! ```rust
//! use extractor::extract_errors;
//!
//! let logs = ["src/app/app.component.ts", "13:1  error Unexpected console statement"];
//! let records = extract_errors("", &logs, "/home/me/app");
//! assert_eq!(records[0].line, 12);
//! ```
//!
//! Extraction never fails. An empty result means nothing was recognized and
//! the raw output should be shown as-is.

pub mod ansi;
pub mod config;
pub mod error;
pub mod extract;
pub mod record;
pub mod summary;

mod blob;
mod fallback;
mod lines;
mod token;
mod xcode;

pub use ansi::{contains_ansi, strip_ansi};
pub use config::ExtractorConfig;
pub use error::{ParseFailure, ParseResult};
pub use extract::{extract_errors, Extraction, ExtractionPhase, Extractor};
pub use record::{BuildFormat, Diagnostic, ErrorRecord};
pub use summary::ExtractionSummary;
