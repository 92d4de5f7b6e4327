//! Sentence/word boundary helpers and script detection, shared by the
//! fallback splitter and the overlap annotator.

pub mod cjk;
pub mod unicode;

pub use unicode::SentenceSegmenter;

/// Split `text` into sentences, preferring a script-specific splitter when
/// the text is predominantly CJK or Arabic.
pub fn split_sentences(text: &str) -> Vec<&str> {
    match cjk::detect_language(text) {
        Some(lang) => SentenceSegmenter::split_with_language(text, lang),
        None => SentenceSegmenter::split_universal(text),
    }
}
