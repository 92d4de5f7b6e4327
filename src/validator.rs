//! Validator (spec §4.11, plus duplication from spec §8 property 8): checks
//! the invariants over a finished chunk list. Strict mode raises the first
//! violation as an error; lenient mode returns every violation as a warning.

use crate::config::Config;
use crate::error::{ChunkError, Result, ValidationErrorKind};
use crate::model::Chunk;

const COVERAGE_MIN: f64 = 0.90;
const COVERAGE_MAX: f64 = 1.70;

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub warnings: Vec<ValidationErrorKind>,
}

pub fn validate(chunks: &[Chunk], original_text: &str, config: &Config, total_lines: usize, strict: bool) -> Result<ValidationResult> {
    let mut warnings = Vec::new();

    check_coverage(chunks, original_text, &mut warnings);
    check_monotonic_ordering(chunks, &mut warnings);
    check_non_empty(chunks, &mut warnings);
    check_size_bounds(chunks, config, &mut warnings);
    check_fence_balance(chunks, &mut warnings);
    check_line_range(chunks, total_lines, &mut warnings);
    check_duplication(chunks, config, &mut warnings);

    if strict {
        if let Some(first) = warnings.into_iter().next() {
            return Err(ChunkError::Validation(first));
        }
        return Ok(ValidationResult::default());
    }

    Ok(ValidationResult { warnings })
}

fn check_coverage(chunks: &[Chunk], original_text: &str, warnings: &mut Vec<ValidationErrorKind>) {
    let original = original_text.chars().count();
    if original == 0 {
        return;
    }
    let kept: usize = chunks.iter().map(|c| c.size).sum();
    let ratio = kept as f64 / original as f64;
    if !(COVERAGE_MIN..=COVERAGE_MAX).contains(&ratio) {
        warnings.push(ValidationErrorKind::DataLoss { kept, original, ratio });
    }
}

fn check_monotonic_ordering(chunks: &[Chunk], warnings: &mut Vec<ValidationErrorKind>) {
    for i in 1..chunks.len() {
        if chunks[i].start_line < chunks[i - 1].start_line {
            warnings.push(ValidationErrorKind::MonotonicOrdering {
                index: i,
                start_line: chunks[i].start_line,
                previous_start_line: chunks[i - 1].start_line,
            });
        }
    }
}

fn check_non_empty(chunks: &[Chunk], warnings: &mut Vec<ValidationErrorKind>) {
    for (index, chunk) in chunks.iter().enumerate() {
        if chunk.content.trim().is_empty() {
            warnings.push(ValidationErrorKind::EmptyChunk { index });
        }
    }
}

fn check_size_bounds(chunks: &[Chunk], config: &Config, warnings: &mut Vec<ValidationErrorKind>) {
    for (index, chunk) in chunks.iter().enumerate() {
        let within_limit = chunk.size <= config.max_chunk_size;
        let labeled_oversize = chunk.metadata.allow_oversize && chunk.metadata.oversize_reason.is_some();
        if !within_limit && !labeled_oversize {
            warnings.push(ValidationErrorKind::SizeBounds {
                index,
                size: chunk.size,
                max: config.max_chunk_size,
            });
        }
    }
}

fn check_fence_balance(chunks: &[Chunk], warnings: &mut Vec<ValidationErrorKind>) {
    for (index, chunk) in chunks.iter().enumerate() {
        if chunk.metadata.is_continuation {
            continue;
        }
        let marker_count = chunk.content.lines().filter(|l| is_fence_marker(l)).count();
        if marker_count % 2 != 0 {
            warnings.push(ValidationErrorKind::FenceImbalance {
                index,
                start_line: chunk.start_line,
                end_line: chunk.end_line,
            });
        }
    }
}

fn check_line_range(chunks: &[Chunk], total_lines: usize, warnings: &mut Vec<ValidationErrorKind>) {
    for (index, chunk) in chunks.iter().enumerate() {
        if chunk.start_line == 0 || chunk.start_line > chunk.end_line || chunk.end_line > total_lines.max(1) {
            warnings.push(ValidationErrorKind::LineRange {
                index,
                start_line: chunk.start_line,
                end_line: chunk.end_line,
                total_lines,
            });
        }
    }
}

/// Testable property 8: for `i != j`, `chunks[i].content` should not
/// duplicate `chunks[j].content` beyond `config.max_duplication_ratio`
/// (default 0.30). Measured at line granularity — the fraction of the
/// smaller chunk's non-blank lines that also appear verbatim in the other —
/// rather than an exact longest-common-substring search, which would be
/// quadratic in content length on top of the already-quadratic chunk pairing.
fn check_duplication(chunks: &[Chunk], config: &Config, warnings: &mut Vec<ValidationErrorKind>) {
    for i in 0..chunks.len() {
        for j in (i + 1)..chunks.len() {
            let ratio = duplication_ratio(&chunks[i].content, &chunks[j].content);
            if ratio > config.max_duplication_ratio {
                warnings.push(ValidationErrorKind::Duplication {
                    a: i,
                    b: j,
                    ratio,
                    max: config.max_duplication_ratio,
                });
            }
        }
    }
}

fn duplication_ratio(a: &str, b: &str) -> f64 {
    let lines_a: std::collections::HashSet<&str> = a.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let lines_b: std::collections::HashSet<&str> = b.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines_a.is_empty() || lines_b.is_empty() {
        return 0.0;
    }
    let shared = lines_a.intersection(&lines_b).count();
    let denom = lines_a.len().min(lines_b.len()) as f64;
    shared as f64 / denom
}

fn is_fence_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}
