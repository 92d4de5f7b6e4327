//! Script detection used to pick a sentence-boundary regex for the fallback
//! strategy and the overlap annotator's truncation logic.

/// Check if text contains CJK characters.
pub fn has_cjk(text: &str) -> bool {
    text.chars().any(is_cjk_char)
}

#[inline]
fn is_cjk_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code) || // CJK Unified Ideographs
    (0x3040..=0x309F).contains(&code) || // Hiragana
    (0x30A0..=0x30FF).contains(&code) || // Katakana
    (0xAC00..=0xD7AF).contains(&code) // Hangul
}

/// Check if text contains Arabic characters.
pub fn has_arabic(text: &str) -> bool {
    text.chars().any(is_arabic_char)
}

#[inline]
fn is_arabic_char(c: char) -> bool {
    let code = c as u32;
    (0x0600..=0x06FF).contains(&code) || // Arabic
    (0x0750..=0x077F).contains(&code) || // Arabic Supplement
    (0x08A0..=0x08FF).contains(&code) || // Arabic Extended-A
    (0xFB50..=0xFDFF).contains(&code) || // Arabic Presentation Forms-A
    (0xFE70..=0xFEFF).contains(&code) // Arabic Presentation Forms-B
}

/// Best-effort language tag for `SentenceSegmenter::split_with_language`.
pub fn detect_language(text: &str) -> Option<&'static str> {
    let mut has_hiragana = false;
    let mut has_katakana = false;
    let mut has_hangul = false;
    let mut has_cjk_ideograph = false;

    for c in text.chars() {
        let code = c as u32;
        if (0x3040..=0x309F).contains(&code) {
            has_hiragana = true;
        }
        if (0x30A0..=0x30FF).contains(&code) {
            has_katakana = true;
        }
        if (0xAC00..=0xD7AF).contains(&code) {
            has_hangul = true;
        }
        if (0x4E00..=0x9FFF).contains(&code) {
            has_cjk_ideograph = true;
        }
        if has_hiragana || has_katakana {
            return Some("ja");
        }
        if has_hangul {
            return Some("ko");
        }
    }

    if has_cjk_ideograph {
        Some("zh")
    } else if has_arabic(text) {
        Some("ar")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cjk() {
        assert!(has_cjk("日本語のテキスト"));
        assert!(!has_cjk("plain english"));
    }

    #[test]
    fn detects_arabic() {
        assert!(has_arabic("مرحبا"));
        assert!(!has_arabic("hello"));
    }

    #[test]
    fn language_detection() {
        assert_eq!(detect_language("こんにちは"), Some("ja"));
        assert_eq!(detect_language("안녕하세요"), Some("ko"));
        assert_eq!(detect_language("你好"), Some("zh"));
        assert_eq!(detect_language("hello"), None);
    }
}
