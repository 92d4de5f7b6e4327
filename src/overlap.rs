//! Overlap annotator (spec §4.8): attaches metadata-only context windows
//! between adjacent chunks. `content` is never touched — overlap only ever
//! lives in `metadata.previous_content` / `metadata.next_content`.

use crate::config::Config;
use crate::model::Chunk;

/// Annotate `chunks` in place with `previous_content`/`next_content`/
/// `overlap_size` on every adjacent pair. A no-op if `enable_overlap` is off
/// or there are fewer than two chunks.
pub fn annotate(chunks: &mut [Chunk], config: &Config) {
    if !config.enable_overlap || chunks.len() < 2 {
        return;
    }

    for i in 0..chunks.len() - 1 {
        let effective = effective_overlap(chunks[i].size, config);
        if effective == 0 {
            continue;
        }

        let next_content = truncate_forward(&chunks[i + 1].content, effective);
        let previous_content = truncate_backward(&chunks[i].content, effective);

        chunks[i].metadata.next_content = Some(next_content);
        chunks[i].metadata.overlap_size = Some(effective);
        chunks[i + 1].metadata.previous_content = Some(previous_content);
        chunks[i + 1].metadata.overlap_size = Some(effective);
    }
}

/// `min(overlap_size, overlap_percentage * size, size / 4)` (spec §4.8), with
/// the percentage term only applied when `overlap_percentage > 0`: read
/// literally the formula would always zero the result at the default
/// `overlap_percentage = 0.0`, which contradicts overlap being on by default
/// — the percentage is a fallback/cap a caller opts into, not a second
/// always-active minimum.
fn effective_overlap(preceding_size: usize, config: &Config) -> usize {
    let quarter = preceding_size / 4;
    let mut effective = config.overlap_size.min(quarter);
    if config.overlap_percentage > 0.0 {
        let by_percentage = (config.overlap_percentage * preceding_size as f64).round() as usize;
        effective = effective.min(by_percentage);
    }
    effective
}

/// Last `max_chars` characters of `content`, pulled back to the nearest
/// whitespace boundary so no word is cut mid-token. Only ever shrinks the
/// window, so the `≤ max_chars` bound from spec §4.8 always holds.
fn truncate_backward(content: &str, max_chars: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= max_chars {
        return content.to_string();
    }
    let ideal_start = chars.len() - max_chars;
    let start = (ideal_start..chars.len())
        .find(|&i| chars[i].is_whitespace())
        .map(|i| i + 1)
        .unwrap_or(ideal_start);
    chars[start..].iter().collect()
}

/// First `max_chars` characters of `content`, truncated forward to the
/// nearest whitespace boundary.
fn truncate_forward(content: &str, max_chars: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= max_chars {
        return content.to_string();
    }
    let end = (0..max_chars).rev().find(|&i| chars[i].is_whitespace()).unwrap_or(max_chars);
    chars[..end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chunk, ChunkMetadata};

    fn chunk(content: &str) -> Chunk {
        Chunk::new(content.to_string(), 1, 1, ChunkMetadata::default())
    }

    #[test]
    fn annotates_adjacent_pairs_without_touching_content() {
        let mut chunks = vec![chunk(&"a".repeat(500)), chunk(&"b".repeat(500))];
        let config = Config::builder().overlap_size(50).build().unwrap();
        annotate(&mut chunks, &config);

        assert!(chunks[0].metadata.next_content.is_some());
        assert!(chunks[1].metadata.previous_content.is_some());
        assert!(!chunks[0].content.contains('b'));
        assert!(!chunks[1].content.contains('a'));
    }

    #[test]
    fn overlap_is_capped_at_a_quarter_of_preceding_size() {
        let mut chunks = vec![chunk(&"a".repeat(40)), chunk(&"b".repeat(500))];
        let config = Config::builder().overlap_size(200).build().unwrap();
        annotate(&mut chunks, &config);
        let overlap_size = chunks[0].metadata.overlap_size.unwrap();
        assert!(overlap_size <= 10);
    }

    #[test]
    fn disabled_overlap_leaves_metadata_empty() {
        let mut chunks = vec![chunk("one"), chunk("two")];
        let config = Config::builder().enable_overlap(false).build().unwrap();
        annotate(&mut chunks, &config);
        assert!(chunks[0].metadata.next_content.is_none());
    }
}
