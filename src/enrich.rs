//! Metadata enricher (spec §4.9): sequential indices, first/last flags,
//! per-chunk content-type classification, and optional adaptive sizing.

use crate::blocks;
use crate::config::Config;
use crate::model::{Chunk, ContentType};

const ADAPTIVE_MIN_SCALE: f64 = 0.5;
const ADAPTIVE_MAX_SCALE: f64 = 1.5;

/// Populate the core metadata fields on every chunk, in place, in one pass.
pub fn enrich(chunks: &mut [Chunk], config: &Config) {
    let total = chunks.len();
    for (index, chunk) in chunks.iter_mut().enumerate() {
        chunk.metadata.chunk_index = index;
        chunk.metadata.total_chunks = total;
        chunk.metadata.is_first_chunk = index == 0;
        chunk.metadata.is_last_chunk = index + 1 == total;
        chunk.metadata.word_count = chunk.content.split_whitespace().count();
        chunk.metadata.line_count = chunk.end_line - chunk.start_line + 1;
        chunk.metadata.char_count = chunk.size;

        if chunk.metadata.content_type != ContentType::Preamble {
            chunk.metadata.content_type = classify_chunk_content_type(&chunk.content);
        }

        if config.use_adaptive_sizing {
            apply_adaptive_sizing(chunk, config);
        }
    }

    for index in 1..chunks.len() {
        chunks[index].metadata.is_continuation = chunks[index].metadata.strategy == chunks[index - 1].metadata.strategy
            && chunks[index].metadata.allow_oversize
            && chunks[index - 1].metadata.allow_oversize
            && chunks[index].start_line == chunks[index - 1].end_line + 1;
    }
}

/// Recompute a coarse `ContentType` from a chunk's own content (spec §4.2's
/// vocabulary, applied at chunk scope rather than document scope).
fn classify_chunk_content_type(content: &str) -> ContentType {
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return ContentType::Text;
    }

    let fence_lines = lines.iter().filter(|l| blocks::parse_fence_open(l).is_some() || is_fence_marker(l)).count();
    let table_lines = lines.iter().filter(|l| blocks::is_table_row_candidate(l)).count();
    let list_lines = lines.iter().filter(|l| blocks::is_list_marker(l)).count();
    let header_lines = lines.iter().filter(|l| blocks::parse_atx_header(l).is_some()).count();

    let total = lines.len().max(1);
    let kinds_present = [fence_lines, table_lines, list_lines].iter().filter(|&&n| n * 3 >= total).count();

    if header_lines == 1 && total <= 2 {
        return ContentType::Header;
    }
    if kinds_present >= 2 {
        return ContentType::Mixed;
    }
    if fence_lines * 2 >= total && fence_lines > 0 {
        return ContentType::Code;
    }
    if table_lines * 2 >= total && table_lines > 0 {
        return ContentType::Table;
    }
    if list_lines * 2 >= total && list_lines > 0 {
        return ContentType::List;
    }
    ContentType::Text
}

fn is_fence_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Spec §4.9's adaptive sizing: an advisory annotation only, never fed back
/// into the strategy loop.
fn apply_adaptive_sizing(chunk: &mut Chunk, config: &Config) {
    let complexity = chunk_complexity(chunk);
    let scale = ADAPTIVE_MIN_SCALE + complexity * (ADAPTIVE_MAX_SCALE - ADAPTIVE_MIN_SCALE);
    chunk.metadata.content_complexity = Some(complexity);
    chunk.metadata.size_scale_factor = Some(scale);
    chunk.metadata.adaptive_size = Some((config.target_chunk_size as f64 * scale).round() as usize);
}

fn chunk_complexity(chunk: &Chunk) -> f64 {
    let lines: Vec<&str> = chunk.content.lines().collect();
    let total = lines.len().max(1) as f64;
    let fence_lines = lines.iter().filter(|l| is_fence_marker(l)).count() as f64;
    let table_lines = lines.iter().filter(|l| blocks::is_table_row_candidate(l)).count() as f64;
    let size_term = if chunk.size < 1000 {
        0.0
    } else if chunk.size < 2000 {
        0.1
    } else if chunk.size < 4096 {
        0.2
    } else {
        0.3
    };
    ((fence_lines / total) * 0.4 + (table_lines / total) * 0.3 + size_term).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChunkMetadata;

    fn chunk(content: &str) -> Chunk {
        Chunk::new(content.to_string(), 1, 1, ChunkMetadata::default())
    }

    #[test]
    fn assigns_sequential_indices_and_flags() {
        let mut chunks = vec![chunk("a"), chunk("b"), chunk("c")];
        enrich(&mut chunks, &Config::default());
        assert_eq!(chunks[0].metadata.chunk_index, 0);
        assert!(chunks[0].metadata.is_first_chunk);
        assert!(!chunks[0].metadata.is_last_chunk);
        assert!(chunks[2].metadata.is_last_chunk);
        assert_eq!(chunks[1].metadata.total_chunks, 3);
    }

    #[test]
    fn classifies_code_chunk() {
        let mut chunks = vec![chunk("```rust\nfn x() {}\n```")];
        enrich(&mut chunks, &Config::default());
        assert_eq!(chunks[0].metadata.content_type, ContentType::Code);
    }

    #[test]
    fn classifies_table_chunk() {
        let mut chunks = vec![chunk("| A | B |\n|---|---|\n| 1 | 2 |")];
        enrich(&mut chunks, &Config::default());
        assert_eq!(chunks[0].metadata.content_type, ContentType::Table);
    }

    #[test]
    fn preamble_content_type_is_preserved() {
        let mut c = chunk("Intro.");
        c.metadata.content_type = ContentType::Preamble;
        let mut chunks = vec![c];
        enrich(&mut chunks, &Config::default());
        assert_eq!(chunks[0].metadata.content_type, ContentType::Preamble);
    }

    #[test]
    fn adaptive_sizing_only_when_enabled() {
        let mut chunks = vec![chunk("some content")];
        enrich(&mut chunks, &Config::default());
        assert!(chunks[0].metadata.adaptive_size.is_none());

        let config = Config::builder().use_adaptive_sizing(true).build().unwrap();
        let mut chunks = vec![chunk("some content")];
        enrich(&mut chunks, &config);
        assert!(chunks[0].metadata.adaptive_size.is_some());
    }
}
