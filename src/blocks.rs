//! Line-level recognition rules shared by the analyzer and the strategies
//! (spec §4.2's seven precedence rules). Kept free of any `Document`/`Config`
//! dependency so both the single analyzer pass and, if a strategy ever needs
//! to re-check a line in isolation, the same predicates apply.

/// Parsed opening fence: `(fence_char, fence_length, language)`.
pub fn parse_fence_open(line: &str) -> Option<(char, usize, Option<String>)> {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();
    if indent > 3 {
        return None;
    }
    let fence_char = trimmed.chars().next()?;
    if fence_char != '`' && fence_char != '~' {
        return None;
    }
    let fence_len = trimmed.chars().take_while(|&c| c == fence_char).count();
    if fence_len < 3 {
        return None;
    }
    let rest = trimmed[fence_len..].trim();
    // Backtick fences cannot have a backtick in the info string (it would be
    // ambiguous with inline code); tilde fences have no such restriction.
    if fence_char == '`' && rest.contains('`') {
        return None;
    }
    let language = rest.split_whitespace().next().map(|s| s.to_lowercase());
    Some((fence_char, fence_len, language))
}

/// Whether `line` closes a fence opened with `(fence_char, fence_len)`.
pub fn is_fence_close(line: &str, fence_char: char, fence_len: usize) -> bool {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();
    if indent > 3 {
        return false;
    }
    let this_len = trimmed.chars().take_while(|&c| c == fence_char).count();
    this_len >= fence_len && trimmed[this_len..].trim().is_empty()
}

/// ATX header: `^#{1,6}\s+.+$`, returning `(level, text)`.
pub fn parse_atx_header(line: &str) -> Option<(u8, String)> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let text = rest.trim().trim_end_matches('#').trim().to_string();
    if text.is_empty() {
        return None;
    }
    Some((hashes as u8, text))
}

/// A Setext underline: `^=+\s*$` (level 1) or `^-+\s*$` (level 2).
pub fn parse_setext_underline(line: &str) -> Option<u8> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

/// `^\s*([*+-]|\d+\.)\s+`
pub fn is_list_marker(line: &str) -> bool {
    list_marker_indent(line).is_some()
}

/// Returns the leading indent (in spaces) of a list marker line, if any.
pub fn list_marker_indent(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();
    let mut chars = trimmed.chars().peekable();
    match chars.peek().copied() {
        Some('*') | Some('+') | Some('-') => {
            chars.next();
            if matches!(chars.next(), Some(' ')) {
                return Some(indent);
            }
            None
        }
        Some(c) if c.is_ascii_digit() => {
            let mut rest = trimmed;
            let digit_count = rest.chars().take_while(|c| c.is_ascii_digit()).count();
            rest = &rest[digit_count..];
            if let Some(after_dot) = rest.strip_prefix('.') {
                if after_dot.starts_with(' ') {
                    return Some(indent);
                }
            }
            None
        }
        _ => None,
    }
}

/// Task list items: `- [ ] ...` / `- [x] ...`.
pub fn is_task_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    let after_bullet = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("+ "));
    match after_bullet {
        Some(rest) => {
            let rest = rest.trim_start();
            rest.starts_with("[ ]") || rest.starts_with("[x]") || rest.starts_with("[X]")
        }
        None => false,
    }
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// A raw candidate table row: contains at least one pipe outside of blank.
pub fn is_table_row_candidate(line: &str) -> bool {
    !is_blank(line) && line.contains('|')
}

/// `|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)+\|?`
pub fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    let stripped = trimmed.trim_start_matches('|').trim_end_matches('|');
    if stripped.is_empty() {
        return false;
    }
    let cells: Vec<&str> = stripped.split('|').collect();
    cells.iter().all(|cell| {
        let c = cell.trim();
        if c.is_empty() {
            return false;
        }
        let c = c.trim_start_matches(':').trim_end_matches(':');
        !c.is_empty() && c.chars().all(|ch| ch == '-')
    })
}

/// Column count implied by a separator row.
pub fn table_column_count(separator_line: &str) -> usize {
    let trimmed = separator_line.trim();
    let stripped = trimmed.trim_start_matches('|').trim_end_matches('|');
    stripped.split('|').count()
}

pub fn is_blockquote(line: &str) -> bool {
    line.trim_start().starts_with('>')
}
