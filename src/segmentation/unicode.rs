//! Sentence segmentation used by the fallback/code-aware splitters and the
//! overlap annotator's sentence-boundary truncation.

use unicode_segmentation::UnicodeSegmentation;

pub struct SentenceSegmenter;

impl SentenceSegmenter {
    /// Unicode default sentence boundaries; works reasonably for any script.
    pub fn split_universal(text: &str) -> Vec<&str> {
        text.unicode_sentences().collect()
    }

    /// Script-specific splitting where the universal segmenter under-performs.
    pub fn split_with_language<'a>(text: &'a str, language: &str) -> Vec<&'a str> {
        match language {
            "ja" => Self::split_on(text, &['。', '！', '？']),
            "zh" | "zh-CN" | "zh-TW" => Self::split_on(text, &['。', '！', '？', '；']),
            "ar" | "ar-SA" | "ar-EG" => Self::split_on(text, &['.', '؟', '!', '،']),
            _ => Self::split_universal(text),
        }
    }

    fn split_on<'a>(text: &'a str, delimiters: &[char]) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            if delimiters.contains(&c) {
                let end = idx + c.len_utf8();
                let slice = text[start..end].trim();
                if !slice.is_empty() {
                    sentences.push(slice);
                }
                start = end;
            }
        }
        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }
        sentences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_english_sentences() {
        let sentences = SentenceSegmenter::split_universal("One. Two! Three?");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn splits_japanese_sentences() {
        let sentences = SentenceSegmenter::split_with_language("最初。次に！終わり？", "ja");
        assert_eq!(sentences.len(), 3);
    }
}
