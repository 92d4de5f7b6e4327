//! Shared span-splitting helpers used by the CodeAware and Fallback
//! strategies (spec §4.5, §4.7): paragraph -> sentence -> word boundary
//! fallback, with line numbers assigned by interpolation across the span
//! (spec §4.7's "preserving line numbers by interpolation").

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::segmentation;

/// Greedily pack `text` into pieces no larger than `max_chunk_size`,
/// preferring to flush near `target_chunk_size`. Falls through
/// paragraph -> sentence -> word granularity only where a unit is itself too
/// large to fit whole.
///
/// Checked at each paragraph (spec §5: fallback must observe cancellation "at
/// paragraph/sentence splits", not just once per call).
pub fn pack_oversized_text(text: &str, max_chunk_size: usize, target_chunk_size: usize, cancel: &CancellationToken) -> Result<Vec<String>> {
    let paragraphs = split_paragraphs(text);
    let mut pieces: Vec<String> = Vec::new();
    for para in paragraphs {
        cancel.check()?;
        if char_len(para) > max_chunk_size {
            pieces.extend(split_oversized_paragraph(para, max_chunk_size, target_chunk_size, cancel)?);
        } else {
            pieces.push(para.to_string());
        }
    }
    Ok(pack_greedy(&pieces, max_chunk_size, target_chunk_size, "\n\n"))
}

/// Split text on blank-line boundaries (one or more consecutive blank
/// lines), trimming each paragraph.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn split_oversized_paragraph(para: &str, max_chunk_size: usize, target_chunk_size: usize, cancel: &CancellationToken) -> Result<Vec<String>> {
    let sentences = segmentation::split_sentences(para);
    if sentences.len() <= 1 {
        return Ok(pack_greedy(&split_words(para), max_chunk_size, target_chunk_size, " "));
    }
    let mut pieces: Vec<String> = Vec::new();
    for sentence in sentences {
        cancel.check()?;
        if char_len(sentence) > max_chunk_size {
            pieces.extend(pack_greedy(&split_words(sentence), max_chunk_size, target_chunk_size, " "));
        } else {
            pieces.push(sentence.to_string());
        }
    }
    Ok(pack_greedy(&pieces, max_chunk_size, target_chunk_size, " "))
}

fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn pack_greedy(pieces: &[String], max_chunk_size: usize, target_chunk_size: usize, separator: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for piece in pieces {
        let joined_len = if current.is_empty() {
            char_len(piece)
        } else {
            char_len(&current) + char_len(separator) + char_len(piece)
        };
        if !current.is_empty() && joined_len > max_chunk_size {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str(separator);
        }
        current.push_str(piece);
        if char_len(&current) >= target_chunk_size {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Assign a `(start_line, end_line)` span to each of `piece_lengths` (in
/// document order) by interpolating proportionally to character length
/// across `[start_line, end_line]`. Spans are contiguous and non-decreasing:
/// each piece's `end_line` becomes the next piece's `start_line`, and the
/// final piece always ends exactly at `end_line`.
pub fn interpolate_spans(start_line: usize, end_line: usize, piece_lengths: &[usize]) -> Vec<(usize, usize)> {
    let total: usize = piece_lengths.iter().sum();
    if piece_lengths.is_empty() {
        return Vec::new();
    }
    if total == 0 || start_line == end_line {
        return piece_lengths.iter().map(|_| (start_line, end_line)).collect();
    }

    let span = (end_line - start_line) as f64;
    let mut spans = Vec::with_capacity(piece_lengths.len());
    let mut cursor = start_line;
    let mut consumed = 0usize;
    for (i, &len) in piece_lengths.iter().enumerate() {
        consumed += len;
        let is_last = i == piece_lengths.len() - 1;
        let piece_end = if is_last {
            end_line
        } else {
            let frac = consumed as f64 / total as f64;
            (start_line as f64 + frac * span).round() as usize
        }
        .clamp(cursor, end_line);
        spans.push((cursor, piece_end));
        cursor = piece_end;
    }
    spans
}
