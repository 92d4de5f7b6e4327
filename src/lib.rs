// src/lib.rs
//! # Markdown Chunker
//!
//! A markdown chunking engine for retrieval/RAG pipelines. Splits a document
//! into size-bounded chunks while never splitting a fenced code block or a
//! pipe table, and while keeping each chunk's place in the document's header
//! hierarchy visible in its metadata.
//!
//! ## Features
//!
//! - **Strategy selection**: code-heavy, mixed, and prose documents each get
//!   a strategy suited to their shape (code-aware, structural, fallback).
//! - **Atomic block preservation**: fenced code and tables are never split.
//! - **Header-path metadata**: every chunk under the structural strategy
//!   knows the full header path that owns it.
//! - **Metadata-only overlap**: adjacent chunks carry a window of their
//!   neighbor's content in `metadata`, never duplicated into `content`.
//! - **Optional hierarchy**: a parent/child/sibling forest over the flat
//!   chunk list, with stable per-chunk ids.
//!
//! ## Quick Start
//!
//! ```rust
//! use markdown_chunker::chunk;
//!
//! let markdown = "# Introduction\n\nThis is a test document.";
//! let result = chunk(markdown, &Default::default()).unwrap();
//! for c in &result.chunks {
//!     println!("chunk: {} chars", c.size);
//! }
//! ```
//!
//! ## Advanced Usage
//!
//! ```rust
//! use markdown_chunker::{chunk_with_metrics, Config};
//!
//! let config = Config::builder().max_chunk_size(800).min_chunk_size(100).build().unwrap();
//! let result = chunk_with_metrics("# My Document\n\nContent here.", &config).unwrap();
//! println!("strategy: {:?}, took {:?}", result.strategy_used, result.processing_time);
//! ```

pub mod analyzer;
pub mod blocks;
pub mod cancel;
pub mod config;
pub mod enrich;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod overlap;
pub mod scanner;
pub mod segmentation;
pub mod selector;
pub mod strategies;
pub mod validator;

pub use cancel::CancellationToken;
pub use config::Config;
pub use error::{ChunkError, Result, ValidationErrorKind};
pub use model::{
    Chunk, ChunkMetadata, ChunkingResult, ContentAnalysis, ContentType, DocumentContentType,
    HierarchicalChunkingResult, OversizeReason, Strategy,
};
pub use validator::ValidationResult;

use scanner::Document;

/// Spec §7's recovery policy: a `ChunkError::Strategy` failure from the
/// selected strategy is recovered locally by falling back in order
/// (selected → Structural → Fallback); every other error kind is fatal and
/// propagates immediately. Fallback never fails on non-empty input.
fn apply_with_fallback(
    doc: &Document,
    analysis: &ContentAnalysis,
    config: &Config,
    selected: Strategy,
    cancel: &CancellationToken,
) -> Result<(Strategy, Vec<Chunk>)> {
    let mut candidates = vec![selected];
    if selected != Strategy::Structural {
        candidates.push(Strategy::Structural);
    }
    if selected != Strategy::Fallback {
        candidates.push(Strategy::Fallback);
    }

    let mut last_err = None;
    for candidate in candidates {
        match strategies::dispatch(candidate).apply(doc, analysis, config, cancel) {
            Ok(chunks) => return Ok((candidate, chunks)),
            Err(ChunkError::Strategy { strategy, message }) => {
                tracing::warn!(strategy, message, "strategy failed, trying next fallback");
                last_err = Some(ChunkError::Strategy { strategy, message });
                continue;
            }
            Err(other) => return Err(other),
        }
    }

    Err(last_err.unwrap_or_else(|| ChunkError::strategy(selected.as_str(), "no strategy produced output")))
}

/// Chunk `text` under `config`, returning only the chunk list's document
/// (spec §3's minimal entry point). See [`chunk_with_metrics`] for strategy
/// and timing information.
pub fn chunk(text: &str, config: &Config) -> Result<Vec<Chunk>> {
    Ok(chunk_with_metrics(text, config)?.chunks)
}

/// Chunk `text` under `config`, validating in lenient mode and returning the
/// full [`ChunkingResult`] (strategy used, timing, complexity score, and any
/// validation warnings).
pub fn chunk_with_metrics(text: &str, config: &Config) -> Result<ChunkingResult> {
    chunk_with_metrics_cancellable(text, config, &CancellationToken::new())
}

/// Same as [`chunk_with_metrics`], but cooperatively cancellable via `cancel`
/// (spec §5). Strategies check `cancel` between spans; a fired cancellation
/// surfaces as `ChunkError::Cancelled`.
pub fn chunk_with_metrics_cancellable(text: &str, config: &Config, cancel: &CancellationToken) -> Result<ChunkingResult> {
    let start = std::time::Instant::now();
    let config = config.clone().validate()?;
    let doc = Document::new(text);

    tracing::debug!(total_lines = doc.total_lines(), total_chars = doc.total_chars(), "scanned document");

    let analysis = analyzer::analyze(&doc, &config)?;
    tracing::debug!(content_type = analysis.content_type.as_str(), complexity = analysis.complexity_score, "analyzed content");

    let selected = selector::select(&analysis, &config);
    tracing::info!(strategy = selected.as_str(), "selected strategy");

    let (strategy, mut chunks) = apply_with_fallback(&doc, &analysis, &config, selected, cancel)?;
    tracing::debug!(chunk_count = chunks.len(), "strategy produced chunks");

    overlap::annotate(&mut chunks, &config);
    enrich::enrich(&mut chunks, &config);

    let validation = validator::validate(&chunks, doc.text(), &config, doc.total_lines(), false)?;
    let warnings: Vec<String> = validation.warnings.iter().map(|w| w.to_string()).collect();
    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "chunking completed with validation warnings");
    }

    Ok(ChunkingResult {
        chunks,
        strategy_used: strategy,
        processing_time: start.elapsed(),
        total_chars: analysis.total_chars,
        total_lines: analysis.total_lines,
        content_type: analysis.content_type,
        complexity_score: analysis.complexity_score,
        warnings,
    })
}

/// Chunk `text` and additionally build the optional hierarchy (spec §4.10).
pub fn chunk_hierarchical(text: &str, config: &Config) -> Result<HierarchicalChunkingResult> {
    chunk_hierarchical_cancellable(text, config, &CancellationToken::new())
}

/// Same as [`chunk_hierarchical`], but cooperatively cancellable.
pub fn chunk_hierarchical_cancellable(text: &str, config: &Config, cancel: &CancellationToken) -> Result<HierarchicalChunkingResult> {
    let result = chunk_with_metrics_cancellable(text, config, cancel)?;
    Ok(hierarchy::build(result.chunks, config, result.strategy_used, result.total_chars, result.total_lines))
}

/// Load a file from disk and chunk it, delegating to [`chunk`] (spec §6).
/// Fails with `ChunkError::Input` on I/O or invalid-UTF-8 errors.
pub fn chunk_file(path: &std::path::Path, config: &Config) -> Result<Vec<Chunk>> {
    let bytes = std::fs::read(path).map_err(|e| ChunkError::input(format!("reading {}: {e}", path.display())))?;
    let doc = Document::from_bytes(&bytes)?;
    chunk(doc.text(), config)
}

/// Validate an already-produced chunk list against `original_text` (spec
/// §4.11). Exposed standalone so callers who persisted chunks separately can
/// re-run invariant checks without re-chunking.
pub fn validate(chunks: &[Chunk], original_text: &str, config: &Config, total_lines: usize, strict: bool) -> Result<ValidationResult> {
    validator::validate(chunks, original_text, config, total_lines, strict)
}
