//! errscan: command-line front end for the build error extractor.
//!
//! The binary owns everything the extractor deliberately does not: reading
//! captured output, loading configuration, resolving record paths against the
//! project folder, and printing.

pub mod config;
pub mod render;
pub mod resolve;

pub use config::CliConfig;
pub use render::{render_json, render_text, OutputFormat};
pub use resolve::{resolve_records, resolve_uri};
