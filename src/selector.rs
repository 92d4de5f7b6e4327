//! Strategy selector (spec §4.4): deterministic, first-match-wins dispatch
//! from a `ContentAnalysis` + `Config` pair to one of the three strategies.

use crate::config::Config;
use crate::model::{ContentAnalysis, Strategy};

/// Pick a strategy. Cheap and pure; never fails (an override is always valid
/// since `Config::validate` does not constrain `strategy_override`).
pub fn select(analysis: &ContentAnalysis, config: &Config) -> Strategy {
    if let Some(forced) = config.strategy_override {
        return forced;
    }

    let has_tables_and_fences = !analysis.tables.is_empty() && !analysis.fenced_blocks.is_empty();
    if analysis.code_ratio >= config.code_threshold || has_tables_and_fences {
        return Strategy::CodeAware;
    }

    if analysis.header_count >= config.structure_threshold {
        return Strategy::Structural;
    }

    Strategy::Fallback
}
