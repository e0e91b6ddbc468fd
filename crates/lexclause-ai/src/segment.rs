//! Clause segmentation: sentences first, then semicolon-delimited sub-clauses.
//!
//! Sentence detection is a capability chosen once via [`default_splitter`]:
//! UAX #29 sentence boundaries when built with the `unicode` feature, otherwise
//! a regex that breaks on whitespace following `.`, `!` or `?`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());
static SEMICOLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";\s*").unwrap());

/// Splits text into sentence-like spans. Spans may carry surrounding whitespace.
pub trait SentenceSplitter: Send + Sync {
    fn name(&self) -> &'static str;
    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Breaks after terminal punctuation followed by whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexSplitter;

impl SentenceSplitter for RegexSplitter {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut spans = Vec::new();
        let mut start = 0;
        for m in SENTENCE_END.find_iter(text) {
            // Punctuation is a single ASCII byte; keep it with the sentence.
            spans.push(&text[start..m.start() + 1]);
            start = m.end();
        }
        spans.push(&text[start..]);
        spans
    }
}

/// Unicode sentence boundaries (UAX #29).
#[cfg(feature = "unicode")]
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSplitter;

#[cfg(feature = "unicode")]
impl SentenceSplitter for UnicodeSplitter {
    fn name(&self) -> &'static str {
        "unicode"
    }

    fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        use unicode_segmentation::UnicodeSegmentation;
        text.unicode_sentences().collect()
    }
}

/// The best splitter available in this build.
pub fn default_splitter() -> Box<dyn SentenceSplitter> {
    #[cfg(feature = "unicode")]
    let splitter: Box<dyn SentenceSplitter> = Box::new(UnicodeSplitter);
    #[cfg(not(feature = "unicode"))]
    let splitter: Box<dyn SentenceSplitter> = Box::new(RegexSplitter);

    debug!(splitter = splitter.name(), "selected sentence splitter");
    splitter
}

/// Split normalised text into ordered, trimmed, non-empty clauses.
pub fn segment(text: &str, splitter: &dyn SentenceSplitter) -> Vec<String> {
    splitter
        .sentences(text)
        .into_iter()
        .flat_map(|sentence| SEMICOLON.split(sentence))
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::clean_text;

    fn clauses(text: &str) -> Vec<String> {
        segment(&clean_text(text), &RegexSplitter)
    }

    #[test]
    fn splits_on_sentences() {
        assert_eq!(
            clauses("This is the first clause. This is the second clause."),
            vec!["This is the first clause.", "This is the second clause."]
        );
    }

    #[test]
    fn splits_on_semicolons_without_adding_punctuation() {
        assert_eq!(
            clauses("This is the first clause; this is the second clause."),
            vec!["This is the first clause", "this is the second clause."]
        );
    }

    #[test]
    fn empty_input_yields_no_clauses() {
        assert!(clauses("").is_empty());
        assert!(clauses("   \n\n ").is_empty());
    }

    #[test]
    fn discards_empty_fragments() {
        assert_eq!(
            clauses("Pay on time;; ; deliver goods;"),
            vec!["Pay on time", "deliver goods"]
        );
    }

    #[test]
    fn question_and_exclamation_end_sentences() {
        assert_eq!(
            RegexSplitter.sentences("Is it due? Yes! Pay now."),
            vec!["Is it due?", "Yes!", "Pay now."]
        );
    }

    #[test]
    fn paragraph_breaks_end_sentences() {
        assert_eq!(
            clauses("Section one applies.\n\nSection two applies."),
            vec!["Section one applies.", "Section two applies."]
        );
    }

    #[test]
    fn punctuation_without_whitespace_does_not_split() {
        assert_eq!(clauses("See s.2.1 of the Act."), vec!["See s.2.1 of the Act."]);
    }

    #[test]
    fn clauses_keep_source_order() {
        let text = "Alpha applies; beta applies. Gamma applies! Delta applies; epsilon.";
        let result = segment(text, &RegexSplitter);
        assert_eq!(result.len(), 5);

        let mut cursor = 0;
        for clause in &result {
            assert_eq!(clause.trim(), clause, "clause not trimmed: {clause:?}");
            let pos = text[cursor..]
                .find(clause.as_str())
                .unwrap_or_else(|| panic!("{clause:?} out of order"));
            cursor += pos + clause.len();
        }
    }

    #[test]
    fn default_splitter_is_usable() {
        let splitter = default_splitter();
        let result = segment("First clause. Second clause.", splitter.as_ref());
        assert_eq!(result, vec!["First clause.", "Second clause."]);
    }

    #[cfg(feature = "unicode")]
    #[test]
    fn unicode_splitter_matches_regex_on_plain_sentences() {
        let text = "This is the first clause. This is the second clause; and a third.";
        assert_eq!(
            segment(text, &UnicodeSplitter),
            segment(text, &RegexSplitter)
        );
    }
}
