//! `chunk`: command-line front end for the markdown chunking engine.
//!
//! Exit codes: 0 success, 1 validation failure, 2 configuration error,
//! 3 input error, 4 cancelled.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use markdown_chunker::{chunk, chunk_hierarchical, chunk_with_metrics, validate, ChunkError, Config, Strategy};

#[derive(Parser)]
#[command(name = "chunk")]
#[command(about = "Split a Markdown file into retrieval-sized chunks")]
#[command(version)]
struct Args {
    /// Markdown file to chunk
    file: PathBuf,

    /// Maximum chunk size in characters
    #[arg(long = "max")]
    max: Option<usize>,

    /// Minimum chunk size in characters
    #[arg(long = "min")]
    min: Option<usize>,

    /// Overlap window size in characters
    #[arg(long)]
    overlap: Option<usize>,

    /// Force a specific strategy: code_aware, structural, fallback
    #[arg(long)]
    strategy: Option<String>,

    /// Named configuration profile (default, code_heavy, structured, dify_rag,
    /// chat_context, search_indexing, fast_processing, minimal)
    #[arg(long)]
    profile: Option<String>,

    /// Emit the full ChunkingResult (strategy, timing, complexity) instead of
    /// a flat chunk array
    #[arg(long)]
    metrics: bool,

    /// Build the optional parent/child/sibling hierarchy
    #[arg(long)]
    hierarchical: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::from(0),
        Err(CliError::Validation(msg)) => {
            eprintln!("validation failure: {msg}");
            ExitCode::from(1)
        }
        Err(CliError::Config(msg)) => {
            eprintln!("configuration error: {msg}");
            ExitCode::from(2)
        }
        Err(CliError::Input(msg)) => {
            eprintln!("input error: {msg}");
            ExitCode::from(3)
        }
        Err(CliError::Cancelled) => {
            eprintln!("cancelled");
            ExitCode::from(4)
        }
    }
}

enum CliError {
    Validation(String),
    Config(String),
    Input(String),
    Cancelled,
}

impl From<ChunkError> for CliError {
    fn from(err: ChunkError) -> Self {
        match err {
            ChunkError::Validation(kind) => CliError::Validation(kind.to_string()),
            ChunkError::Config(msg) => CliError::Config(msg),
            ChunkError::Cancelled => CliError::Cancelled,
            // Input, Analyzer, Oversize, and Strategy errors are all surfaced
            // to the caller as a problem with the given input.
            other => CliError::Input(other.to_string()),
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let mut config = match &args.profile {
        Some(name) => Config::profile(name).map_err(CliError::from)?,
        None => Config::default(),
    };

    if let Some(max) = args.max {
        config.max_chunk_size = max;
    }
    if let Some(min) = args.min {
        config.min_chunk_size = min;
    }
    if let Some(overlap) = args.overlap {
        config.overlap_size = overlap;
    }
    if let Some(strategy) = &args.strategy {
        config.strategy_override = Some(strategy.parse::<Strategy>().map_err(CliError::Config)?);
    }
    let config = config.validate().map_err(CliError::from)?;

    let text = std::fs::read_to_string(&args.file).map_err(|e| CliError::Input(format!("reading {}: {e}", args.file.display())))?;

    tracing::info!(file = %args.file.display(), "chunking file");

    if args.hierarchical {
        let result = chunk_hierarchical(&text, &config)?;
        let report = validate(&result.chunks, &text, &config, result.total_lines, true)?;
        debug_assert!(report.warnings.is_empty());
        println!("{}", serde_json::to_string_pretty(&result).map_err(|e| CliError::Input(e.to_string()))?);
        return Ok(());
    }

    if args.metrics {
        let result = chunk_with_metrics(&text, &config)?;
        if !result.warnings.is_empty() {
            return Err(CliError::Validation(result.warnings.join("; ")));
        }
        println!("{}", serde_json::to_string_pretty(&result).map_err(|e| CliError::Input(e.to_string()))?);
        return Ok(());
    }

    let chunks = chunk(&text, &config)?;
    println!("{}", serde_json::to_string_pretty(&chunks).map_err(|e| CliError::Input(e.to_string()))?);
    Ok(())
}
