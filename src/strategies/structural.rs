//! Structural strategy (spec §4.6): groups content under its owning header
//! and exposes a `header_path` per chunk.
//!
//! Design decision (recorded in the design ledger): spec §4.6 step 3 defines
//! a header's "section" as running until the next header of the *same or
//! higher* level, which would make a parent header's section overlap with
//! its children's. That overlap is unworkable for the monotonic-ordering and
//! one-owner-per-line invariants (§8 properties 2 and 6), so each header here
//! instead owns only the lines up to the *next header of any level* — the
//! same per-header partition the hierarchy builder's parent/child linking
//! already assumes via `header_path` prefix matching. `sub_headers` is left
//! empty under this partition (a chunk never contains a second header).

use super::{build_chunk, pack_range, ChunkStrategy};
use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::Result;
use crate::model::{Chunk, ContentAnalysis, ContentType, Strategy};
use crate::scanner::Document;

const PREAMBLE_PATH: &str = "/__preamble__";
const HEADER_ONLY_MERGE_THRESHOLD: usize = 150;

pub struct StructuralStrategy;

impl ChunkStrategy for StructuralStrategy {
    fn strategy_name(&self) -> Strategy {
        Strategy::Structural
    }

    fn apply(
        &self,
        doc: &Document,
        analysis: &ContentAnalysis,
        config: &Config,
        cancel: &CancellationToken,
    ) -> Result<Vec<Chunk>> {
        if doc.total_lines() == 0 {
            return Ok(Vec::new());
        }

        let mut chunks = Vec::new();

        if analysis.headers.is_empty() {
            return pack_range(doc, analysis, config, 1, doc.total_lines(), Strategy::Structural, cancel);
        }

        if config.extract_preamble && analysis.preamble_end_line > 0 && !analysis.preamble.trim().is_empty() {
            let mut preamble = build_chunk(doc, 1, analysis.preamble_end_line, Strategy::Structural);
            preamble.metadata.content_type = ContentType::Preamble;
            preamble.metadata.header_path = Some(PREAMBLE_PATH.to_string());
            chunks.push(preamble);
        }

        let mut stack: Vec<(u8, String)> = Vec::new();
        for (i, header) in analysis.headers.iter().enumerate() {
            cancel.check()?;
            stack.retain(|&(level, _)| level < header.level);
            stack.push((header.level, header.text.clone()));

            let section_start = header.start_line;
            let section_end = analysis
                .headers
                .get(i + 1)
                .map(|next| next.start_line - 1)
                .unwrap_or(doc.total_lines());
            if section_end < section_start {
                continue;
            }

            let header_path = format!("/{}", stack.iter().map(|(_, text)| text.as_str()).collect::<Vec<_>>().join("/"));
            let section_chunks = pack_range(doc, analysis, config, section_start, section_end, Strategy::Structural, cancel)?;
            for mut chunk in section_chunks {
                chunk.metadata.header_path = Some(header_path.clone());
                chunk.metadata.header_level = Some(header.level);
                chunks.push(chunk);
            }
        }

        Ok(merge_small_chunks(chunks, config))
    }
}

fn is_header_only(chunk: &Chunk) -> bool {
    chunk.size < HEADER_ONLY_MERGE_THRESHOLD
        && chunk.content.lines().filter(|l| !l.trim().is_empty()).count() <= 1
}

fn merge_adjacent(a: &Chunk, b: &Chunk) -> Chunk {
    let content = format!("{}\n\n{}", a.content, b.content).trim().to_string();
    let start_line = a.start_line.min(b.start_line);
    let end_line = a.end_line.max(b.end_line);
    let mut metadata = a.metadata.clone();
    metadata.start_line = start_line;
    metadata.end_line = end_line;
    metadata.line_count = end_line - start_line + 1;
    metadata.allow_oversize = a.metadata.allow_oversize || b.metadata.allow_oversize;
    metadata.oversize_reason = a.metadata.oversize_reason.or(b.metadata.oversize_reason);
    Chunk::new(content, start_line, end_line, metadata)
}

fn same_section(a: &Chunk, b: &Chunk) -> bool {
    match (&a.metadata.header_path, &b.metadata.header_path) {
        (Some(x), Some(y)) => x == y && x != PREAMBLE_PATH,
        (None, None) => true,
        _ => false,
    }
}

/// Spec §4.6 step 6: absorb header-only chunks into their following body,
/// then merge undersized neighbors within the same section, preferring the
/// left neighbor. Never merges across a preamble boundary.
fn merge_small_chunks(chunks: Vec<Chunk>, config: &Config) -> Vec<Chunk> {
    let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if let Some(prev) = merged.last() {
            if is_header_only(prev) && same_section(prev, &chunk) {
                let combined = merge_adjacent(prev, &chunk);
                merged.pop();
                merged.push(combined);
                continue;
            }
        }
        merged.push(chunk);
    }

    let mut result: Vec<Chunk> = Vec::with_capacity(merged.len());
    for chunk in merged {
        let fits_with_left = result
            .last()
            .is_some_and(|left| same_section(left, &chunk) && left.size + chunk.size <= config.max_chunk_size);
        if chunk.size < config.min_chunk_size && fits_with_left {
            let left = result.pop().unwrap();
            result.push(merge_adjacent(&left, &chunk));
            continue;
        }
        result.push(chunk);
    }

    // A second pass: a chunk too small to have found a left merge may still
    // fit with its right neighbor.
    let mut final_result: Vec<Chunk> = Vec::with_capacity(result.len());
    let mut iter = result.into_iter().peekable();
    while let Some(chunk) = iter.next() {
        if chunk.size < config.min_chunk_size {
            if let Some(next) = iter.peek() {
                if same_section(&chunk, next) && chunk.size + next.size <= config.max_chunk_size {
                    let next = iter.next().unwrap();
                    final_result.push(merge_adjacent(&chunk, &next));
                    continue;
                }
            }
        }
        final_result.push(chunk);
    }

    final_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;

    fn chunks_for(text: &str, config: &Config) -> Vec<Chunk> {
        let doc = Document::new(text);
        let analysis = analyzer::analyze(&doc, config).unwrap();
        StructuralStrategy.apply(&doc, &analysis, config, &CancellationToken::new()).unwrap()
    }

    #[test]
    fn preamble_and_single_section() {
        let config = Config::default();
        let chunks = chunks_for("Intro text with link https://example.com.\n\n# Title\n\nBody paragraph.\n", &config);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].metadata.header_path.as_deref(), Some("/__preamble__"));
        assert_eq!(chunks[0].metadata.content_type, ContentType::Preamble);
        assert_eq!(chunks[1].metadata.header_path.as_deref(), Some("/Title"));
        assert_eq!(chunks[1].metadata.header_level, Some(1));
    }

    #[test]
    fn nested_headers_get_full_path() {
        let config = Config::default();
        let chunks = chunks_for("# A\n\ntext\n\n## B\n\nmore text\n", &config);
        assert_eq!(chunks.iter().find(|c| c.content.contains("text\n") || c.content.contains("text")).unwrap().metadata.header_path, chunks[0].metadata.header_path);
        let deep = chunks.iter().find(|c| c.metadata.header_path.as_deref() == Some("/A/B")).unwrap();
        assert!(deep.content.contains("more text"));
    }

    #[test]
    fn header_paths_all_start_with_slash() {
        let config = Config::default();
        let chunks = chunks_for("# One\n\nbody\n\n# Two\n\nbody two\n", &config);
        for chunk in &chunks {
            if let Some(path) = &chunk.metadata.header_path {
                assert!(path.starts_with('/'));
            }
        }
    }
}
