//! Configuration model (spec §4.3) and the profile factories of spec §6.
//!
//! Grounded on two teacher patterns: the retrieved pack's `ChunkerConfig`
//! (serde-derived struct, `validate()` returning a typed error, preset
//! constructors) and this crate's own teacher `ChunkerBuilder` (fluent
//! builder over a small set of size knobs).

use serde::{Deserialize, Serialize};

use crate::error::{ChunkError, Result};
use crate::model::Strategy;

/// Every tunable the spec recognizes (spec §4.3's table).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_chunk_size: usize,
    pub min_chunk_size: usize,
    pub target_chunk_size: usize,
    pub overlap_size: usize,
    pub overlap_percentage: f64,
    pub enable_overlap: bool,
    pub preserve_atomic_blocks: bool,
    pub extract_preamble: bool,
    pub code_threshold: f64,
    pub structure_threshold: usize,
    pub strategy_override: Option<Strategy>,
    pub allow_oversize: bool,
    pub include_document_summary: bool,
    pub use_adaptive_sizing: bool,
    /// Duplication ceiling for testable property 8 (not in the §4.3 table,
    /// but referenced by spec §8 and needed by the validator).
    pub max_duplication_ratio: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chunk_size: 4096,
            min_chunk_size: 512,
            target_chunk_size: 2048,
            overlap_size: 200,
            overlap_percentage: 0.0,
            enable_overlap: true,
            preserve_atomic_blocks: true,
            extract_preamble: true,
            code_threshold: 0.3,
            structure_threshold: 3,
            strategy_override: None,
            allow_oversize: true,
            include_document_summary: false,
            use_adaptive_sizing: false,
            max_duplication_ratio: 0.30,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Resolve a named profile from spec §6. Returns `ConfigError` for an
    /// unrecognized name.
    pub fn profile(name: &str) -> Result<Self> {
        match name {
            "default" => Ok(Self::default()),
            "code_heavy" => Ok(Self::code_heavy()),
            "structured" => Ok(Self::structured()),
            "dify_rag" => Ok(Self::dify_rag()),
            "chat_context" => Ok(Self::chat_context()),
            "search_indexing" => Ok(Self::search_indexing()),
            "fast_processing" => Ok(Self::fast_processing()),
            "minimal" => Ok(Self::minimal()),
            other => Err(ChunkError::config(format!("unknown profile: {other}"))),
        }
    }

    /// Tuned for source-heavy documentation: larger chunks, lower code
    /// threshold so a single snippet doesn't tip the whole doc to Structural.
    pub fn code_heavy() -> Self {
        Self {
            max_chunk_size: 6144,
            min_chunk_size: 768,
            target_chunk_size: 3072,
            code_threshold: 0.15,
            ..Default::default()
        }
    }

    /// Tuned for deeply-headed reference docs: lower structure threshold,
    /// larger overlap so header context survives section boundaries.
    pub fn structured() -> Self {
        Self {
            structure_threshold: 2,
            overlap_size: 300,
            include_document_summary: true,
            ..Default::default()
        }
    }

    /// Mirrors the parameters of the `dify_rag` integration this spec
    /// distills its config-profile surface from.
    pub fn dify_rag() -> Self {
        Self {
            max_chunk_size: 2000,
            min_chunk_size: 200,
            target_chunk_size: 1000,
            overlap_size: 200,
            ..Default::default()
        }
    }

    /// Small, heavily-overlapped chunks for conversational LLM context
    /// windows where continuity across chunk boundaries matters more than
    /// chunk count.
    pub fn chat_context() -> Self {
        Self {
            max_chunk_size: 1500,
            min_chunk_size: 300,
            target_chunk_size: 800,
            overlap_size: 250,
            overlap_percentage: 0.15,
            ..Default::default()
        }
    }

    /// Larger, less-overlapped chunks for bulk search indexing where storage
    /// cost per chunk matters more than conversational continuity.
    pub fn search_indexing() -> Self {
        Self {
            max_chunk_size: 8192,
            min_chunk_size: 1024,
            target_chunk_size: 4096,
            overlap_size: 100,
            use_adaptive_sizing: true,
            ..Default::default()
        }
    }

    /// Skips overlap and hierarchy work entirely; forces Fallback so the
    /// analyzer/selector pass is cheap too.
    pub fn fast_processing() -> Self {
        Self {
            enable_overlap: false,
            extract_preamble: false,
            strategy_override: Some(Strategy::Fallback),
            ..Default::default()
        }
    }

    /// The smallest reasonable configuration: no overlap, no preamble
    /// extraction, oversize disallowed.
    pub fn minimal() -> Self {
        Self {
            enable_overlap: false,
            extract_preamble: false,
            allow_oversize: false,
            max_chunk_size: 2048,
            min_chunk_size: 256,
            target_chunk_size: 1024,
            ..Default::default()
        }
    }

    /// Validate invariants, auto-adjusting monotonically where spec §4.3
    /// allows it, and failing with `ConfigError` only if an invariant would
    /// still be violated afterwards.
    pub fn validate(mut self) -> Result<Self> {
        if self.max_chunk_size == 0 {
            return Err(ChunkError::config("max_chunk_size must be > 0"));
        }
        if self.min_chunk_size == 0 {
            return Err(ChunkError::config("min_chunk_size must be > 0"));
        }
        if self.target_chunk_size == 0 {
            return Err(ChunkError::config("target_chunk_size must be > 0"));
        }

        if self.min_chunk_size > self.max_chunk_size {
            self.min_chunk_size = (self.max_chunk_size / 2).max(1);
        }
        if self.target_chunk_size > self.max_chunk_size {
            self.target_chunk_size = self.max_chunk_size;
        }
        if self.target_chunk_size < self.min_chunk_size {
            self.target_chunk_size = self.min_chunk_size;
        }
        if !(self.min_chunk_size <= self.target_chunk_size && self.target_chunk_size <= self.max_chunk_size) {
            return Err(ChunkError::config(format!(
                "min_chunk_size ({}) <= target_chunk_size ({}) <= max_chunk_size ({}) still violated after adjustment",
                self.min_chunk_size, self.target_chunk_size, self.max_chunk_size
            )));
        }

        if !(0.0..=1.0).contains(&self.overlap_percentage) {
            return Err(ChunkError::config("overlap_percentage must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.code_threshold) {
            return Err(ChunkError::config("code_threshold must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.max_duplication_ratio) {
            return Err(ChunkError::config("max_duplication_ratio must be in [0, 1]"));
        }

        if self.overlap_size >= self.max_chunk_size {
            self.overlap_size = self.max_chunk_size.saturating_sub(1).max(1);
        }
        if self.overlap_size >= self.max_chunk_size {
            return Err(ChunkError::config("overlap_size must be < max_chunk_size"));
        }

        Ok(self)
    }
}

/// Fluent builder over `Config`, grounded on the teacher's `ChunkerBuilder`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn max_chunk_size(mut self, v: usize) -> Self {
        self.config.max_chunk_size = v;
        self
    }

    pub fn min_chunk_size(mut self, v: usize) -> Self {
        self.config.min_chunk_size = v;
        self
    }

    pub fn target_chunk_size(mut self, v: usize) -> Self {
        self.config.target_chunk_size = v;
        self
    }

    pub fn overlap_size(mut self, v: usize) -> Self {
        self.config.overlap_size = v;
        self
    }

    pub fn overlap_percentage(mut self, v: f64) -> Self {
        self.config.overlap_percentage = v;
        self
    }

    pub fn enable_overlap(mut self, v: bool) -> Self {
        self.config.enable_overlap = v;
        self
    }

    pub fn preserve_atomic_blocks(mut self, v: bool) -> Self {
        self.config.preserve_atomic_blocks = v;
        self
    }

    pub fn extract_preamble(mut self, v: bool) -> Self {
        self.config.extract_preamble = v;
        self
    }

    pub fn code_threshold(mut self, v: f64) -> Self {
        self.config.code_threshold = v;
        self
    }

    pub fn structure_threshold(mut self, v: usize) -> Self {
        self.config.structure_threshold = v;
        self
    }

    pub fn strategy_override(mut self, v: Strategy) -> Self {
        self.config.strategy_override = Some(v);
        self
    }

    pub fn allow_oversize(mut self, v: bool) -> Self {
        self.config.allow_oversize = v;
        self
    }

    pub fn include_document_summary(mut self, v: bool) -> Self {
        self.config.include_document_summary = v;
        self
    }

    pub fn use_adaptive_sizing(mut self, v: bool) -> Self {
        self.config.use_adaptive_sizing = v;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn all_profiles_are_valid() {
        for name in [
            "default",
            "code_heavy",
            "structured",
            "dify_rag",
            "chat_context",
            "search_indexing",
            "fast_processing",
            "minimal",
        ] {
            Config::profile(name).unwrap().validate().unwrap();
        }
    }

    #[test]
    fn unknown_profile_is_an_error() {
        assert!(Config::profile("nonexistent").is_err());
    }

    #[test]
    fn min_above_max_is_auto_adjusted() {
        let config = Config::builder()
            .max_chunk_size(1000)
            .min_chunk_size(5000)
            .target_chunk_size(5000)
            .build()
            .unwrap();
        assert!(config.min_chunk_size <= config.target_chunk_size);
        assert!(config.target_chunk_size <= config.max_chunk_size);
    }

    #[test]
    fn zero_max_chunk_size_is_an_error() {
        let result = Config::builder().max_chunk_size(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn overlap_size_above_max_is_auto_adjusted() {
        let config = Config::builder()
            .max_chunk_size(100)
            .overlap_size(500)
            .build()
            .unwrap();
        assert!(config.overlap_size < config.max_chunk_size);
    }

    #[test]
    fn out_of_range_ratio_is_an_error() {
        assert!(Config::builder().code_threshold(1.5).build().is_err());
    }
}
