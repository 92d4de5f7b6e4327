//! Fallback strategy (spec §4.7): paragraph-greedy packing for unstructured
//! text. Guaranteed to produce at least one chunk for non-empty input.
//!
//! Cancellation (spec §5) is checked both on entry and at each paragraph
//! inside `split::pack_oversized_text`, not just once up front — a single
//! large document can spend most of its time in that loop.

use super::{build_chunk_from_text, split, ChunkStrategy};
use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::Result;
use crate::model::{Chunk, ContentAnalysis, Strategy};
use crate::scanner::Document;

pub struct FallbackStrategy;

impl ChunkStrategy for FallbackStrategy {
    fn strategy_name(&self) -> Strategy {
        Strategy::Fallback
    }

    fn apply(
        &self,
        doc: &Document,
        _analysis: &ContentAnalysis,
        config: &Config,
        cancel: &CancellationToken,
    ) -> Result<Vec<Chunk>> {
        let text = doc.text();
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        cancel.check()?;
        let pieces = split::pack_oversized_text(text, config.max_chunk_size, config.target_chunk_size, cancel)?;
        let lengths: Vec<usize> = pieces.iter().map(|p| p.chars().count()).collect();
        let spans = split::interpolate_spans(1, doc.total_lines(), &lengths);

        Ok(pieces
            .into_iter()
            .zip(spans)
            .map(|(text, (start, end))| build_chunk_from_text(text, start, end, Strategy::Fallback))
            .filter(|c| !c.content.trim().is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;

    fn chunks_for(text: &str, config: &Config) -> Vec<Chunk> {
        let doc = Document::new(text);
        let analysis = analyzer::analyze(&doc, config).unwrap();
        FallbackStrategy.apply(&doc, &analysis, config, &CancellationToken::new()).unwrap()
    }

    #[test]
    fn never_fails_on_non_empty_input() {
        let config = Config::default();
        let chunks = chunks_for("Just a short paragraph with no structure at all.", &config);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn respects_max_chunk_size() {
        let text = "Word ".repeat(5000);
        let config = Config::builder().max_chunk_size(200).target_chunk_size(150).build().unwrap();
        let chunks = chunks_for(&text, &config);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.size <= config.max_chunk_size || !c.content.contains(' '));
        }
    }

    #[test]
    fn empty_input_produces_no_chunks() {
        let config = Config::default();
        let chunks = chunks_for("   \n\n  ", &config);
        assert!(chunks.is_empty());
    }

    #[test]
    fn cancellation_is_observed() {
        let doc = Document::new("First paragraph.\n\nSecond paragraph.\n\nThird paragraph.");
        let config = Config::default();
        let analysis = analyzer::analyze(&doc, &config).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = FallbackStrategy.apply(&doc, &analysis, &config, &cancel);
        assert!(matches!(result, Err(crate::error::ChunkError::Cancelled)));
    }
}
