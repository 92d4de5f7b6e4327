//! CodeAware strategy (spec §4.5): splits around atomic blocks (fenced code,
//! tables) while keeping everything else within `max_chunk_size`.

use super::{pack_range, ChunkStrategy};
use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::Result;
use crate::model::{Chunk, ContentAnalysis, Strategy};
use crate::scanner::Document;

pub struct CodeAwareStrategy;

impl ChunkStrategy for CodeAwareStrategy {
    fn strategy_name(&self) -> Strategy {
        Strategy::CodeAware
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
        pack_range(doc, analysis, config, 1, doc.total_lines(), Strategy::CodeAware, cancel)
    }
}
