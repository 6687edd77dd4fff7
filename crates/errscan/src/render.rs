//! Record output formats.

use anyhow::{Context, Result};
use extractor::ErrorRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// `uri:line:col: message`, 1-based, one record per line
    #[default]
    Text,
    /// JSON array of 0-based records
    Json,
}

/// Human-readable listing. Coordinates are shown 1-based, as compilers print them.
pub fn render_text(records: &[ErrorRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}

pub fn render_json(records: &[ErrorRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize error records")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ErrorRecord> {
        vec![
            ErrorRecord {
                uri: "src/a.ts".to_string(),
                line: 12,
                position: 0,
                error: "Unexpected console statement".to_string(),
            },
            ErrorRecord {
                uri: "src/b.ts".to_string(),
                line: 0,
                position: 4,
                error: "Missing semicolon".to_string(),
            },
        ]
    }

    #[test]
    fn test_render_text_one_based() {
        assert_eq!(
            render_text(&sample()),
            "src/a.ts:13:1: Unexpected console statement\nsrc/b.ts:1:5: Missing semicolon\n"
        );
    }

    #[test]
    fn test_render_text_empty() {
        assert_eq!(render_text(&[]), "");
    }

    #[test]
    fn test_render_json_zero_based() {
        let json = render_json(&sample()).unwrap();
        let parsed: Vec<ErrorRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
        assert!(json.contains("\"line\": 12"));
    }
}
