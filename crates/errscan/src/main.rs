use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use errscan::{render_json, render_text, resolve_records, CliConfig, OutputFormat};
use extractor::{ExtractionSummary, Extractor};
use tracing::{debug, info};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File holding captured build output (stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Project root the build ran in (defaults to the current directory)
    #[arg(long)]
    folder: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// TOML config file with an [extractor] table (overrides ERRSCAN_* env)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rewrite relative paths against --folder when the joined file exists
    #[arg(long, default_value_t = false)]
    resolve: bool,

    /// Print a one-line summary after the records
    #[arg(long, default_value_t = false)]
    summary: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("errscan: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = CliConfig::load(args.config.as_deref())?;
    let folder = match args.folder {
        Some(folder) => folder,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let text = match args.input {
        Some(ref path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    debug!(bytes = text.len(), folder = %folder.display(), "Read build output");

    let extractor = Extractor::new(config.extractor);
    let extraction = extractor.extract(&text, &[] as &[&str], &folder.to_string_lossy());

    if extraction.is_empty() {
        info!("No build errors recognized, echoing raw output");
        eprint!("{}", text);
        return Ok(ExitCode::from(1));
    }

    let summary = args
        .summary
        .then(|| ExtractionSummary::from_extraction(&extraction));
    let mut records = extraction.into_records();
    if args.resolve {
        records = resolve_records(&folder, records);
    }

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&records)),
        OutputFormat::Json => println!("{}", render_json(&records)?),
    }
    if let Some(summary) = summary {
        println!("{}", summary.compact_text());
    }

    Ok(ExitCode::SUCCESS)
}
