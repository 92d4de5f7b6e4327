//! Content analyzer (spec §4.2): a single forward pass over the document that
//! builds the structural inventory (fenced blocks, tables, headers, lists)
//! and the aggregate ratios/complexity score the strategy selector and
//! enricher depend on.

use crate::blocks;
use crate::config::Config;
use crate::error::{ChunkError, Result};
use crate::model::{ContentAnalysis, DocumentContentType, FencedBlock, Header, ListBlock, ListKind, Table};
use crate::scanner::Document;

/// Minimum header count for the `"structural"` content-type label, independent
/// of the strategy selector's own (configurable) `structure_threshold`.
const STRUCTURAL_LABEL_THRESHOLD: usize = 3;

/// `config.preserve_atomic_blocks` governs whether an unbounded fenced block
/// (no matching close before EOF) is fatal (spec §4.2/§7). When the flag is
/// off, the block is closed at EOF instead of raising `ChunkError::Analyzer`
/// — the caller has already said it doesn't need fences kept intact.
pub fn analyze(doc: &Document, config: &Config) -> Result<ContentAnalysis> {
    let total_lines = doc.total_lines();
    let mut analysis = ContentAnalysis {
        total_chars: doc.total_chars(),
        total_lines,
        total_words: doc.text().split_whitespace().count(),
        ..Default::default()
    };

    let mut line_no = 1usize;
    let mut first_header_line: Option<usize> = None;

    while line_no <= total_lines {
        let line = doc.line(line_no);

        if let Some((fence_char, fence_len, language)) = blocks::parse_fence_open(line) {
            let start = line_no;
            let mut end = line_no;
            let mut closed = false;
            let mut cursor = line_no + 1;
            while cursor <= total_lines {
                if blocks::is_fence_close(doc.line(cursor), fence_char, fence_len) {
                    end = cursor;
                    closed = true;
                    break;
                }
                cursor += 1;
            }
            if !closed {
                if config.preserve_atomic_blocks {
                    return Err(ChunkError::analyzer(format!(
                        "unbalanced fence starting at line {start}: no matching close found"
                    )));
                }
                end = total_lines;
            }
            let raw_content = doc.slice_lines(start, end).to_string();
            analysis.code_chars += raw_content.chars().count();
            analysis.fenced_blocks.push(FencedBlock {
                start_line: start,
                end_line: end,
                language,
                raw_content,
                fence_length: fence_len,
            });
            line_no = end + 1;
            continue;
        }

        if blocks::is_table_row_candidate(line)
            && line_no + 1 <= total_lines
            && blocks::is_table_separator(doc.line(line_no + 1))
        {
            let start = line_no;
            let column_count = blocks::table_column_count(doc.line(line_no + 1));
            let mut end = line_no + 1;
            let mut cursor = line_no + 2;
            while cursor <= total_lines && blocks::is_table_row_candidate(doc.line(cursor)) {
                end = cursor;
                cursor += 1;
            }
            let raw_content = doc.slice_lines(start, end).to_string();
            analysis.table_chars += raw_content.chars().count();
            analysis.tables.push(Table {
                start_line: start,
                end_line: end,
                column_count,
                has_header: true,
                raw_content,
            });
            line_no = end + 1;
            continue;
        }

        if let Some((level, text)) = blocks::parse_atx_header(line) {
            if first_header_line.is_none() {
                first_header_line = Some(line_no);
            }
            analysis.max_header_depth = analysis.max_header_depth.max(level);
            analysis.headers.push(Header {
                level,
                text,
                start_line: line_no,
            });
            line_no += 1;
            continue;
        }

        if !blocks::is_blank(line)
            && line_no + 1 <= total_lines
            && !blocks::is_list_marker(line)
            && !blocks::is_blockquote(line)
        {
            if let Some(level) = blocks::parse_setext_underline(doc.line(line_no + 1)) {
                if first_header_line.is_none() {
                    first_header_line = Some(line_no);
                }
                analysis.max_header_depth = analysis.max_header_depth.max(level);
                analysis.headers.push(Header {
                    level,
                    text: line.trim().to_string(),
                    start_line: line_no,
                });
                line_no += 2;
                continue;
            }
        }

        if blocks::is_list_marker(line) {
            let start = line_no;
            let base_indent = blocks::list_marker_indent(line).unwrap_or(0);
            let mut max_indent = base_indent;
            let kind = if blocks::is_task_marker(line) {
                ListKind::Task
            } else if line.trim_start().starts_with(|c: char| c.is_ascii_digit()) {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            };
            let mut end = line_no;
            let mut cursor = line_no + 1;
            while cursor <= total_lines {
                let l = doc.line(cursor);
                if blocks::is_list_marker(l) {
                    let indent = blocks::list_marker_indent(l).unwrap_or(0);
                    max_indent = max_indent.max(indent);
                    end = cursor;
                    cursor += 1;
                } else if l.starts_with("  ") && !blocks::is_blank(l) {
                    end = cursor;
                    cursor += 1;
                } else if blocks::is_blank(l) {
                    // A single blank line may separate loose list items; two in
                    // a row ends the list.
                    if cursor + 1 <= total_lines && blocks::is_blank(doc.line(cursor + 1)) {
                        break;
                    }
                    if cursor + 1 <= total_lines && blocks::is_list_marker(doc.line(cursor + 1)) {
                        end = cursor;
                        cursor += 1;
                    } else {
                        break;
                    }
                } else {
                    break;
                }
            }
            let raw_content = doc.slice_lines(start, end);
            analysis.list_chars += raw_content.chars().count();
            analysis.lists.push(ListBlock {
                start_line: start,
                end_line: end,
                kind,
                max_depth: 1 + max_indent / 2,
            });
            line_no = end + 1;
            continue;
        }

        if blocks::is_blank(line) {
            line_no += 1;
            continue;
        }

        // Paragraph text (rule 7): consume contiguous lines until a line that
        // would start a different block kind.
        let start = line_no;
        let mut end = line_no;
        let mut cursor = line_no + 1;
        loop {
            if cursor > total_lines {
                break;
            }
            let l = doc.line(cursor);
            if blocks::is_blank(l)
                || blocks::parse_atx_header(l).is_some()
                || blocks::parse_fence_open(l).is_some()
                || blocks::is_list_marker(l)
                || blocks::is_blockquote(l)
                || (blocks::is_table_row_candidate(l)
                    && cursor + 1 <= total_lines
                    && blocks::is_table_separator(doc.line(cursor + 1)))
            {
                break;
            }
            if cursor + 1 <= total_lines {
                if let Some(_lvl) = blocks::parse_setext_underline(doc.line(cursor + 1)) {
                    break;
                }
            }
            end = cursor;
            cursor += 1;
        }
        let raw = doc.slice_lines(start, end);
        analysis.text_chars += raw.chars().count();
        line_no = end + 1;
    }

    analysis.header_count = analysis.headers.len();
    analysis.nested_list_depth = analysis.lists.iter().map(|l| l.max_depth).max().unwrap_or(0);

    if let Some(first) = first_header_line {
        analysis.preamble = if first > 1 {
            doc.slice_lines(1, first - 1).to_string()
        } else {
            String::new()
        };
        analysis.preamble_end_line = first.saturating_sub(1);
    } else {
        analysis.preamble = doc.text().to_string();
        analysis.preamble_end_line = total_lines;
    }

    let denom = (analysis.total_chars.max(1)) as f64;
    analysis.code_ratio = analysis.code_chars as f64 / denom;
    analysis.table_ratio = analysis.table_chars as f64 / denom;
    analysis.list_ratio = analysis.list_chars as f64 / denom;
    analysis.text_ratio = analysis.text_chars as f64 / denom;

    analysis.complexity_score = complexity_score(&analysis);
    analysis.content_type = classify_content_type(&analysis, STRUCTURAL_LABEL_THRESHOLD);

    Ok(analysis)
}

fn complexity_score(a: &ContentAnalysis) -> f64 {
    let structural = (a.max_header_depth as f64 / 10.0).min(0.1)
        + (a.nested_list_depth as f64 / 10.0).min(0.1)
        + if !a.tables.is_empty() { 0.1 } else { 0.0 };

    let kinds_present = [a.code_ratio, a.table_ratio, a.list_ratio]
        .iter()
        .filter(|&&r| r >= 0.1)
        .count();
    let content = a.code_ratio * 0.2 + if kinds_present >= 2 { 0.2 } else { 0.0 };

    let size = if a.total_chars < 10_000 {
        0.0
    } else if a.total_chars < 20_000 {
        0.1
    } else if a.total_chars < 50_000 {
        0.2
    } else {
        0.3
    };

    (structural + content + size).min(1.0)
}

fn classify_content_type(a: &ContentAnalysis, structure_threshold: usize) -> DocumentContentType {
    if a.code_ratio >= 0.7 {
        DocumentContentType::CodeHeavy
    } else if a.code_ratio >= 0.3
        || [a.code_ratio, a.table_ratio, a.list_ratio]
            .iter()
            .filter(|&&r| r >= 0.1)
            .count()
            >= 2
    {
        DocumentContentType::Mixed
    } else if a.header_count >= structure_threshold {
        DocumentContentType::Structural
    } else {
        DocumentContentType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_str(s: &str) -> ContentAnalysis {
        let doc = Document::new(s);
        analyze(&doc, &Config::default()).unwrap()
    }

    #[test]
    fn detects_fenced_code() {
        let a = analyze_str("# T\n\n```rust\nfn x() {}\n```\n\nmore text");
        assert_eq!(a.fenced_blocks.len(), 1);
        assert_eq!(a.fenced_blocks[0].language.as_deref(), Some("rust"));
    }

    #[test]
    fn unbalanced_fence_is_an_error() {
        let doc = Document::new("```rust\nfn x() {}\n");
        assert!(analyze(&doc, &Config::default()).is_err());
    }

    #[test]
    fn unbalanced_fence_is_closed_at_eof_when_atomic_blocks_not_preserved() {
        let doc = Document::new("```rust\nfn x() {}\n");
        let config = Config::builder().preserve_atomic_blocks(false).build().unwrap();
        let a = analyze(&doc, &config).unwrap();
        assert_eq!(a.fenced_blocks.len(), 1);
        assert_eq!(a.fenced_blocks[0].end_line, doc.total_lines());
    }

    #[test]
    fn detects_table() {
        let a = analyze_str("| A | B |\n|---|---|\n| 1 | 2 |\n");
        assert_eq!(a.tables.len(), 1);
        assert_eq!(a.tables[0].column_count, 2);
    }

    #[test]
    fn detects_atx_and_setext_headers() {
        let a = analyze_str("Title\n=====\n\nBody\n\nSub\n---\n\nMore.\n\n# ATX\n");
        assert_eq!(a.headers.len(), 3);
        assert_eq!(a.headers[0].level, 1);
        assert_eq!(a.headers[1].level, 2);
        assert_eq!(a.headers[2].level, 1);
    }

    #[test]
    fn setext_not_detected_inside_fence() {
        let a = analyze_str("```\nTitle\n---\n```\n");
        assert_eq!(a.headers.len(), 0);
        assert_eq!(a.fenced_blocks.len(), 1);
    }

    #[test]
    fn preamble_captured_before_first_header() {
        let a = analyze_str("Intro line.\n\n# Title\n\nBody.");
        assert!(a.preamble.contains("Intro line."));
        assert!(!a.preamble.contains("Title"));
    }

    #[test]
    fn no_header_means_whole_document_is_preamble() {
        let a = analyze_str("Just text.\n\nMore text.");
        assert!(a.preamble.contains("Just text."));
        assert_eq!(a.headers.len(), 0);
    }
}
