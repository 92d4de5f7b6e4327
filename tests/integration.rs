use markdown_chunker::{chunk, chunk_hierarchical, chunk_with_metrics, validate, Chunk, ChunkMetadata, Config, ContentType, Strategy, ValidationErrorKind};

/// Scenario A — preamble + single section.
#[test]
fn preamble_and_single_section() {
    let text = "Intro text with link https://example.com.\n\n# Title\n\nBody paragraph.\n";
    let result = chunk_with_metrics(text, &Config::default()).unwrap();

    assert_eq!(result.chunks.len(), 2);
    assert_eq!(result.strategy_used, Strategy::Structural);

    assert_eq!(result.chunks[0].metadata.content_type, ContentType::Preamble);
    assert_eq!(result.chunks[0].metadata.header_path.as_deref(), Some("/__preamble__"));
    assert!(result.chunks[0].content.contains("Intro text"));

    assert_eq!(result.chunks[1].metadata.header_path.as_deref(), Some("/Title"));
    assert_eq!(result.chunks[1].metadata.header_level, Some(1));
    assert!(result.chunks[1].content.contains("# Title"));
    assert!(result.chunks[1].content.contains("Body paragraph."));
}

/// Scenario B — atomic oversize code block.
#[test]
fn oversize_code_block_is_preserved_whole() {
    let body = "x".repeat(10_000);
    let text = format!("```rust\n{body}\n```\n");
    let config = Config::builder().max_chunk_size(4096).allow_oversize(true).build().unwrap();

    let result = chunk_with_metrics(&text, &config).unwrap();
    assert_eq!(result.strategy_used, Strategy::CodeAware);

    let code_chunk = result.chunks.iter().find(|c| c.metadata.content_type == ContentType::Code).unwrap();
    assert!(code_chunk.size >= 10_000);
    assert!(code_chunk.metadata.allow_oversize);
    assert_eq!(code_chunk.metadata.oversize_reason.unwrap().as_str(), "code_block_integrity");
}

/// Scenario C — monotonic ordering under mixed headed/code content.
#[test]
fn monotonic_ordering_under_mixed_content() {
    let mut text = String::new();
    for i in 0..10 {
        text.push_str(&format!("# Section {i}\n\nSome prose for section {i}.\n\n```rust\nfn s{i}() {{}}\n```\n\n"));
    }
    let config = Config::builder().max_chunk_size(1024).build().unwrap();
    let result = chunk_with_metrics(&text, &config).unwrap();

    for window in result.chunks.windows(2) {
        assert!(window[0].start_line <= window[1].start_line);
    }
    for c in &result.chunks {
        if let Some(path) = &c.metadata.header_path {
            assert!(path.starts_with('/'));
        }
        let fence_markers = c.content.lines().filter(|l| l.trim_start().starts_with("```")).count();
        assert!(fence_markers % 2 == 0 || c.metadata.is_continuation);
    }
}

/// Scenario D — idempotence, including stable chunk_ids under hierarchical mode.
#[test]
fn chunking_is_idempotent() {
    let text = "# A\n\nSome text here.\n\n## B\n\nMore text in a sub-section.\n\n# C\n\nFinal section.\n";
    let config = Config::default();

    let first = chunk(text, &config).unwrap();
    let second = chunk(text, &config).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.content, b.content);
        assert_eq!(a.start_line, b.start_line);
        assert_eq!(a.end_line, b.end_line);
    }

    let hier_a = chunk_hierarchical(text, &config).unwrap();
    let hier_b = chunk_hierarchical(text, &config).unwrap();
    let ids_a: Vec<_> = hier_a.chunks.iter().map(|c| c.metadata.chunk_id.clone()).collect();
    let ids_b: Vec<_> = hier_b.chunks.iter().map(|c| c.metadata.chunk_id.clone()).collect();
    assert_eq!(ids_a, ids_b);
}

/// Scenario E — overlap lives only in metadata, never duplicated into content.
#[test]
fn overlap_is_metadata_only() {
    let text = format!("{}\n\n{}\n", "First section text. ".repeat(100), "Second section text. ".repeat(100));
    let config = Config::builder().max_chunk_size(1200).overlap_size(100).build().unwrap();
    let result = chunk_with_metrics(&text, &config).unwrap();
    assert!(result.chunks.len() >= 2);

    let overlap_size = result.chunks[0].metadata.overlap_size.unwrap_or(0);
    assert!(overlap_size <= 100);

    let previous_content = result.chunks[1].metadata.previous_content.clone().unwrap_or_default();
    assert!(previous_content.chars().count() <= 100);
    assert!(!result.chunks[1].content.contains(&previous_content) || previous_content.is_empty());

    let next_content = result.chunks[0].metadata.next_content.clone().unwrap_or_default();
    assert!(!result.chunks[0].content.contains(&next_content) || next_content.is_empty());
}

/// Scenario F — fallback activation on unstructured text.
#[test]
fn fallback_activates_on_plain_text() {
    let text = "word ".repeat(1000);
    let config = Config::builder().structure_threshold(3).code_threshold(0.3).max_chunk_size(1024).build().unwrap();
    let result = chunk_with_metrics(&text, &config).unwrap();

    assert_eq!(result.strategy_used, Strategy::Fallback);
    assert!(!result.chunks.is_empty());
    for c in &result.chunks {
        assert!(c.size <= config.max_chunk_size || !c.content.contains(' '));
        assert!(!c.content.trim().is_empty());
    }
}

#[test]
fn coverage_stays_within_expected_band() {
    let text = "# Doc\n\nSome paragraph of reasonable length describing the topic at hand.\n\n## Sub\n\nMore detail follows here.\n";
    let result = chunk_with_metrics(text, &Config::default()).unwrap();
    let kept: usize = result.chunks.iter().map(|c| c.size).sum();
    let original = text.chars().count();
    let ratio = kept as f64 / original as f64;
    assert!((0.90..=1.70).contains(&ratio), "ratio {ratio} out of band");
}

#[test]
fn hierarchy_levels_are_consistent_with_nesting() {
    let text = "# A\n\ntext\n\n## B\n\nmore\n\n### C\n\neven more\n";
    let result = chunk_hierarchical(text, &Config::default()).unwrap();
    let by_path: std::collections::HashMap<_, _> =
        result.chunks.iter().map(|c| (c.metadata.header_path.clone(), c.metadata.hierarchy_level)).collect();
    assert!(by_path[&Some("/A".to_string())] < by_path[&Some("/A/B".to_string())]);
    assert!(by_path[&Some("/A/B".to_string())] < by_path[&Some("/A/B/C".to_string())]);
}

/// Property 8 — pairwise duplication ratio over `max_duplication_ratio`.
#[test]
fn duplicate_chunk_content_is_flagged_by_validation() {
    let shared = "Repeated line one.\nRepeated line two.\nRepeated line three.";
    let a = Chunk::new(shared.to_string(), 1, 3, ChunkMetadata::default());
    let b = Chunk::new(shared.to_string(), 4, 6, ChunkMetadata::default());
    let original = format!("{shared}\n{shared}");

    let result = validate(&[a, b], &original, &Config::default(), 6, false).unwrap();
    assert!(result.warnings.iter().any(|w| matches!(w, ValidationErrorKind::Duplication { .. })));
}

#[test]
fn ordinary_chunking_produces_no_duplication_warnings() {
    let text = "# A\n\nFirst section body.\n\n# B\n\nSecond section body, unrelated content.\n";
    let result = chunk_with_metrics(text, &Config::default()).unwrap();
    assert!(!result.warnings.iter().any(|w| w.contains("share")));
}

#[test]
fn serialization_round_trips() {
    let text = "# Title\n\nBody text.\n\n## Sub\n\nMore body text.\n";
    let result = chunk_with_metrics(text, &Config::default()).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: markdown_chunker::ChunkingResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.chunks.len(), result.chunks.len());
    assert_eq!(back.strategy_used, result.strategy_used);
    for (a, b) in result.chunks.iter().zip(back.chunks.iter()) {
        assert_eq!(a.content, b.content);
        assert_eq!(a.start_line, b.start_line);
        assert_eq!(a.metadata.chunk_index, b.metadata.chunk_index);
    }
}
