//! Property tests: randomized validation of extraction invariants across
//! generated inputs.
//!
//! Tests verify:
//! - ANSI stripping is idempotent
//! - Empty logs behave exactly like logs split from the error text
//! - Extraction never panics on garbage, including near-miss format shapes
//! - Every returned record has a non-empty uri and message
//! - Repeated calls give identical output

use extractor::{extract_errors, strip_ansi, ErrorRecord, Extractor};

/// Small deterministic xorshift generator so failures are reproducible.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next() % items.len() as u64) as usize]
    }
}

/// Fragments that look like pieces of the recognized formats, plus noise.
const FRAGMENTS: &[&str] = &[
    "src/app/app.component.ts",
    "src/App.vue",
    "13:1  error Unexpected console statement",
    "x:y  error bad coords",
    "TypeScript error in /app/src/App.tsx(7,3):",
    "TypeScript error in (",
    "src/main.ts(5,3): error TS2304: Cannot find name 'foo'.",
    "): error ",
    " ERROR  in src/main.ts:5:1",
    "error  in :::",
    "SyntaxError: /app/src/App.js: Unexpected token (12:5)",
    "SyntaxError: (",
    "/proj/App.java:12: error: cannot find symbol",
    "/proj error:",
    "Error: Expected 1 to be 2.",
    "    at x (src/a.spec.ts:1:1)",
    "    at <Jasmine>",
    "Error: src/x.ts:3:9 - error TS2304: oops",
    "Error: :::: - - -",
    "src/app/app.module.ts:18:3 - error TS2391: Missing.",
    "- error TS",
    "FAIL src/counter.test.ts",
    "  ● adds",
    "FAIL ",
    "✘ [ERROR] Could not resolve",
    "    src/main.ts:3:7:",
    "Failed to compile.",
    "   ,-[/app/page.tsx:3:1]",
    ",-[",
    "/p/A.swift:8:1: error: Expected 'func'",
    ".swift: error",
    "(in target 'App' from project 'App')",
    "Building xArchive",
    "[error] Command line invocation:",
    "\u{1b}[31m",
    "\u{1b}[",
    "\u{9b}",
    "\u{1b}",
    "99999999999999999999999:1  error overflow",
    "",
    "   ",
    "\r",
    "●",
    "×",
    "é漢字🙂",
    "(",
    ")",
    ":",
];

fn random_text(rng: &mut Rng, max_lines: u64) -> String {
    let line_count = rng.next() % max_lines;
    let mut lines = Vec::new();
    for _ in 0..line_count {
        let pieces = 1 + rng.next() % 3;
        let mut line = String::new();
        for _ in 0..pieces {
            line.push_str(rng.pick(FRAGMENTS));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn assert_records_valid(records: &[ErrorRecord]) {
    for record in records {
        assert!(!record.uri.trim().is_empty(), "empty uri in {:?}", record);
        assert!(!record.error.trim().is_empty(), "empty error in {:?}", record);
        assert!(!record.error.contains('\u{1b}'), "ANSI left in {:?}", record);
    }
}

// ── Property: stripping ANSI twice equals stripping once ───────────

#[test]
fn prop_strip_ansi_idempotent() {
    let mut rng = Rng(0x5eed_1234_abcd_0001);
    for _ in 0..500 {
        let text = random_text(&mut rng, 6);
        let once = strip_ansi(&text);
        assert_eq!(strip_ansi(&once), once, "not idempotent for {:?}", text);
    }
}

// ── Property: empty logs == logs split from the text ───────────────

#[test]
fn prop_empty_logs_equivalent_to_split_text() {
    let mut rng = Rng(0x5eed_1234_abcd_0002);
    for _ in 0..500 {
        let text = random_text(&mut rng, 8);
        if text.is_empty() {
            continue;
        }
        let split: Vec<&str> = text.split('\n').collect();
        let derived = extract_errors(&text, &[] as &[&str], "/proj");
        let explicit = extract_errors(&text, &split, "/proj");
        assert_eq!(derived, explicit, "logs derivation differs for {:?}", text);
    }
}

// ── Property: extraction is total and records are well-formed ──────

#[test]
fn prop_never_panics_and_records_valid() {
    let mut rng = Rng(0x5eed_1234_abcd_0003);
    let extractor = Extractor::default();
    for round in 0..2000 {
        let text = random_text(&mut rng, 10);
        let logs_text = random_text(&mut rng, 10);
        let logs: Vec<&str> = if round % 2 == 0 {
            Vec::new()
        } else {
            logs_text.split('\n').collect()
        };
        let folder = if round % 3 == 0 { "" } else { "/proj" };

        let extraction = extractor.extract(&text, &logs, folder);
        assert_records_valid(&extraction.records());
    }
}

#[test]
fn prop_arbitrary_chars_never_panic() {
    let mut rng = Rng(0x5eed_1234_abcd_0004);
    for _ in 0..1000 {
        let len = rng.next() % 200;
        let text: String = (0..len)
            .filter_map(|_| char::from_u32((rng.next() % 0x2000) as u32))
            .collect();
        let records = extract_errors(&text, &[] as &[&str], "/proj");
        assert_records_valid(&records);
    }
}

// ── Property: output is a pure function of input ───────────────────

#[test]
fn prop_deterministic() {
    let mut rng = Rng(0x5eed_1234_abcd_0005);
    let extractor = Extractor::default();
    for _ in 0..300 {
        let text = random_text(&mut rng, 8);
        let logs_text = random_text(&mut rng, 8);
        let logs: Vec<&str> = logs_text.split('\n').collect();
        let first = extractor.extract(&text, &logs, "/proj");
        let second = extractor.extract(&text, &logs, "/proj");
        assert_eq!(first, second);
    }
}
