//! Error taxonomy (spec §7).
//!
//! Grounded on the `thiserror`-derived enum style used for library error
//! surfaces elsewhere in the retrieved pack: one variant per failure kind, each
//! carrying a human-readable message and whatever structured context spec §7
//! calls for (offending chunk index, line range, violated invariant).

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ChunkError>;

/// The validator sub-kinds from spec §7 (named indicative, not closed — see
/// the `SizeBounds` and `Duplication` additions below).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    #[error("content loss: kept {kept} of {original} chars (ratio {ratio:.3}, expected [0.90, 1.70])")]
    DataLoss {
        kept: usize,
        original: usize,
        ratio: f64,
    },

    #[error("chunk {index} starts at line {start_line}, before preceding chunk's line {previous_start_line}")]
    MonotonicOrdering {
        index: usize,
        start_line: usize,
        previous_start_line: usize,
    },

    #[error("chunk {index} is empty after whitespace-stripping")]
    EmptyChunk { index: usize },

    #[error("chunk {index} (lines {start_line}-{end_line}) has an odd fence-marker count and is not a continuation")]
    FenceImbalance {
        index: usize,
        start_line: usize,
        end_line: usize,
    },

    #[error("chunk {index} is {size} chars, over max_chunk_size {max}, without a labeled oversize reason")]
    SizeBounds {
        index: usize,
        size: usize,
        max: usize,
    },

    #[error("chunk {index} has invalid line range {start_line}..={end_line} (document has {total_lines} lines)")]
    LineRange {
        index: usize,
        start_line: usize,
        end_line: usize,
        total_lines: usize,
    },

    #[error("coverage gap: chunks only reference {covered} of {total_lines} lines")]
    IncompleteCoverage { covered: usize, total_lines: usize },

    #[error("chunks {a} and {b} share a {ratio:.3} fraction of their content, over max_duplication_ratio {max}")]
    Duplication {
        a: usize,
        b: usize,
        ratio: f64,
        max: f64,
    },
}

/// Top-level error type returned by every public entry point.
#[derive(Error, Debug)]
pub enum ChunkError {
    /// Config invariants still violated after auto-adjustment (spec §4.3).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Invalid UTF-8 or I/O failure loading a file (spec §4.1).
    #[error("input error: {0}")]
    Input(String),

    /// An unbounded fenced block (no matching close) under
    /// `preserve_atomic_blocks` (spec §4.2).
    #[error("analyzer error: {0}")]
    Analyzer(String),

    /// An atomic block exceeds `max_chunk_size` with `allow_oversize = false`
    /// (spec §4.5).
    #[error("oversize error: block at lines {start_line}-{end_line} is {size} chars, max is {max}")]
    Oversize {
        start_line: usize,
        end_line: usize,
        size: usize,
        max: usize,
    },

    /// Strategy-specific failure. Non-fatal: the selector recovers by falling
    /// back in order (spec §7's propagation policy); this variant is only
    /// surfaced if every strategy in the fallback chain fails.
    #[error("strategy error ({strategy}): {message}")]
    Strategy { strategy: String, message: String },

    /// Invariant violation raised in strict mode, or collected as a warning in
    /// lenient mode.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrorKind),

    /// The caller's cancellation signal fired.
    #[error("cancelled")]
    Cancelled,
}

impl ChunkError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn analyzer(msg: impl Into<String>) -> Self {
        Self::Analyzer(msg.into())
    }

    pub fn strategy(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Strategy {
            strategy: strategy.into(),
            message: message.into(),
        }
    }
}
