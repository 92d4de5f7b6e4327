//! The three chunking strategies (spec §4.5–4.7) behind one trait, plus the
//! span-splitting helpers they share (`split`).

pub mod code_aware;
pub mod fallback;
pub mod split;
pub mod structural;

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::{ChunkError, Result};
use crate::model::{Chunk, ChunkMetadata, ContentAnalysis, OversizeReason, Strategy};
use crate::scanner::Document;

/// Common interface the selector dispatches to (spec §9: "polymorphism over
/// strategies... a tagged variant... with a common `apply` operation").
pub trait ChunkStrategy {
    fn strategy_name(&self) -> Strategy;
    fn apply(
        &self,
        doc: &Document,
        analysis: &ContentAnalysis,
        config: &Config,
        cancel: &CancellationToken,
    ) -> Result<Vec<Chunk>>;
}

/// Build a `Chunk` from a document span, trimming edge whitespace per spec
/// §3 ("possibly whitespace-trimmed at edges"). `content_type` is left at its
/// default; the enricher (spec §4.9) recomputes it from the final content.
pub(crate) fn build_chunk(doc: &Document, start_line: usize, end_line: usize, strategy: Strategy) -> Chunk {
    let content = doc.slice_lines(start_line, end_line).trim().to_string();
    let metadata = ChunkMetadata {
        strategy,
        start_line,
        end_line,
        line_count: end_line - start_line + 1,
        ..Default::default()
    };
    Chunk::new(content, start_line, end_line, metadata)
}

/// Build a `Chunk` from already-split text (oversized paragraph pieces),
/// whose line span was assigned by `split::interpolate_spans`.
pub(crate) fn build_chunk_from_text(content: String, start_line: usize, end_line: usize, strategy: Strategy) -> Chunk {
    let trimmed = content.trim().to_string();
    let metadata = ChunkMetadata {
        strategy,
        start_line,
        end_line,
        line_count: end_line - start_line + 1,
        ..Default::default()
    };
    Chunk::new(trimmed, start_line, end_line, metadata)
}

/// One unit of the span walk described in spec §4.5 step 1: either an atomic
/// block (never split) or a run of ordinary text lines.
enum Span {
    Atomic { start: usize, end: usize, reason: OversizeReason },
    Text { start: usize, end: usize },
}

/// Partition `[range_start, range_end]` into the ordered atomic/text spans
/// spec §4.5 step 1 describes, scoped to a sub-range (used by the structural
/// strategy to walk one section at a time). When `preserve_atomic_blocks` is
/// `false`, fenced blocks and tables are not treated as atomic at all — the
/// whole range is handed back as one `Text` span, free to be split like any
/// other text by `pack_range`.
fn ordered_spans(analysis: &ContentAnalysis, range_start: usize, range_end: usize, preserve_atomic_blocks: bool) -> Vec<Span> {
    if !preserve_atomic_blocks {
        return vec![Span::Text { start: range_start, end: range_end }];
    }

    let mut atomics: Vec<(usize, usize, OversizeReason)> = analysis
        .fenced_blocks
        .iter()
        .filter(|b| b.start_line >= range_start && b.end_line <= range_end)
        .map(|b| (b.start_line, b.end_line, OversizeReason::CodeBlockIntegrity))
        .chain(
            analysis
                .tables
                .iter()
                .filter(|t| t.start_line >= range_start && t.end_line <= range_end)
                .map(|t| (t.start_line, t.end_line, OversizeReason::TableIntegrity)),
        )
        .collect();
    atomics.sort_by_key(|&(s, _, _)| s);

    let mut spans = Vec::new();
    let mut cursor = range_start;
    for (start, end, reason) in atomics {
        if start > cursor {
            spans.push(Span::Text { start: cursor, end: start - 1 });
        }
        spans.push(Span::Atomic { start, end, reason });
        cursor = end + 1;
    }
    if cursor <= range_end {
        spans.push(Span::Text { start: cursor, end: range_end });
    }
    spans
}

/// Walk the atomic/text spans of `[start_line, end_line]`, packing into
/// chunks under `max_chunk_size` (spec §4.5 steps 2–3). Shared by the
/// CodeAware strategy (whole document) and the Structural strategy (one
/// section at a time).
pub(crate) fn pack_range(
    doc: &Document,
    analysis: &ContentAnalysis,
    config: &Config,
    start_line: usize,
    end_line: usize,
    strategy: Strategy,
    cancel: &CancellationToken,
) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::new();
    let mut group_start: Option<usize> = None;
    let mut group_end = start_line;
    let mut group_chars = 0usize;

    let flush = |chunks: &mut Vec<Chunk>, group_start: &mut Option<usize>, group_end: usize, group_chars: &mut usize| {
        if let Some(s) = group_start.take() {
            chunks.push(build_chunk(doc, s, group_end, strategy));
            *group_chars = 0;
        }
    };

    for span in ordered_spans(analysis, start_line, end_line, config.preserve_atomic_blocks) {
        cancel.check()?;
        match span {
            Span::Atomic { start, end, reason } => {
                let span_chars = doc.slice_lines(start, end).chars().count();
                if span_chars > config.max_chunk_size {
                    flush(&mut chunks, &mut group_start, group_end, &mut group_chars);
                    if !config.allow_oversize {
                        return Err(ChunkError::Oversize {
                            start_line: start,
                            end_line: end,
                            size: span_chars,
                            max: config.max_chunk_size,
                        });
                    }
                    let mut chunk = build_chunk(doc, start, end, strategy);
                    chunk.metadata.allow_oversize = true;
                    chunk.metadata.oversize_reason = Some(reason);
                    chunks.push(chunk);
                    continue;
                }
                if group_start.is_some() && group_chars + span_chars > config.max_chunk_size {
                    flush(&mut chunks, &mut group_start, group_end, &mut group_chars);
                }
                group_start.get_or_insert(start);
                group_end = end;
                group_chars += span_chars;
            }
            Span::Text { start, end } => {
                let span_chars = doc.slice_lines(start, end).chars().count();
                if span_chars > config.max_chunk_size {
                    flush(&mut chunks, &mut group_start, group_end, &mut group_chars);
                    let text = doc.slice_lines(start, end).to_string();
                    let pieces = split::pack_oversized_text(&text, config.max_chunk_size, config.target_chunk_size, cancel)?;
                    let lengths: Vec<usize> = pieces.iter().map(|p| p.chars().count()).collect();
                    for (piece, (s, e)) in pieces.into_iter().zip(split::interpolate_spans(start, end, &lengths)) {
                        chunks.push(build_chunk_from_text(piece, s, e, strategy));
                    }
                    continue;
                }
                if group_start.is_some() && group_chars + span_chars > config.max_chunk_size {
                    flush(&mut chunks, &mut group_start, group_end, &mut group_chars);
                }
                group_start.get_or_insert(start);
                group_end = end;
                group_chars += span_chars;
            }
        }
    }
    flush(&mut chunks, &mut group_start, group_end, &mut group_chars);

    Ok(chunks)
}

pub(crate) fn dispatch(strategy: Strategy) -> Box<dyn ChunkStrategy> {
    match strategy {
        Strategy::CodeAware => Box::new(code_aware::CodeAwareStrategy),
        Strategy::Structural => Box::new(structural::StructuralStrategy),
        Strategy::Fallback => Box::new(fallback::FallbackStrategy),
    }
}
