//! Line scanner (spec §4.1).
//!
//! Splits input on `\n`, preserving empty lines, and builds a line table for
//! O(1) line/offset lookups. CRLF is treated as LF for line indexing (the
//! teacher crate normalizes `\r\n` -> `\n` before splitting); this scanner goes
//! one step further and keeps the normalization local to the `Document` so the
//! rest of the pipeline never has to think about `\r` again.

use crate::error::{ChunkError, Result};

/// An immutable, line-indexed view over a document's text (spec §3).
///
/// `line_start_offset[i]` gives the byte offset of the first character of the
/// 1-indexed line `i + 1`. Lines are `&str` slices into the normalized text.
pub struct Document {
    text: String,
    line_start_offset: Vec<usize>,
    lines: Vec<(usize, usize)>,
}

impl Document {
    /// Build a `Document` from raw input, normalizing CRLF/CR to LF.
    ///
    /// Fails only on invalid UTF-8; callers should validate bytes with
    /// `from_bytes` if they have a raw byte source (e.g. `chunk_file`).
    pub fn new(text: &str) -> Self {
        let normalized = if text.contains('\r') {
            text.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            text.to_string()
        };

        let mut line_start_offset = Vec::new();
        let mut lines = Vec::new();
        let mut start = 0usize;
        for (i, _) in normalized.match_indices('\n') {
            line_start_offset.push(start);
            lines.push((start, i));
            start = i + 1;
        }
        // Trailing line with no terminating '\n' (or the whole doc if there
        // were no newlines at all).
        line_start_offset.push(start);
        lines.push((start, normalized.len()));

        Self {
            text: normalized,
            line_start_offset,
            lines,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ChunkError::input(format!("invalid UTF-8: {e}")))?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn total_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// 1-indexed line lookup. Panics if `line` is out of range; callers should
    /// stay within `1..=total_lines()`.
    pub fn line(&self, line: usize) -> &str {
        let (start, end) = self.lines[line - 1];
        &self.text[start..end]
    }

    pub fn lines_iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(move |&(s, e)| &self.text[s..e])
    }

    /// Byte offset of the first character of a 1-indexed line.
    pub fn line_to_offset(&self, line: usize) -> usize {
        self.line_start_offset[line - 1]
    }

    /// 1-indexed line containing a byte offset.
    pub fn offset_to_line(&self, offset: usize) -> usize {
        match self.line_start_offset.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i, // i is the count of starts <= offset... adjust below
        }
    }

    /// Slice of the normalized text spanning 1-indexed inclusive lines
    /// `[start_line, end_line]`, without a trailing newline.
    pub fn slice_lines(&self, start_line: usize, end_line: usize) -> &str {
        let (s, _) = self.lines[start_line - 1];
        let (_, e) = self.lines[end_line - 1];
        &self.text[s..e]
    }
}
