//! Text normalisation ahead of segmentation.

use std::sync::LazyLock;

use regex::Regex;

/// Marker some upstream exporters prepend to the document body.
pub const BOILERPLATE_PREFIX: &str = "Legal Document Text:";

/// Punctuation kept alongside alphanumerics and whitespace.
const PERMITTED_PUNCTUATION: &[char] = &['.', ',', ';', ':', '(', ')', '[', ']', '{', '}', '\'', '-'];

static MULTI_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Normalise raw text.
///
/// 1. Strip [`BOILERPLATE_PREFIX`] (and surrounding whitespace) if present.
/// 2. Drop every character that is not alphanumeric, whitespace, or permitted punctuation.
/// 3. Replace double quotes with single quotes.
/// 4. Split on blank lines, collapse runs of spaces, trim, drop empty paragraphs,
///    and rejoin with blank lines.
///
/// The output is never longer than the input.
pub fn clean_text(text: &str) -> String {
    let text = match text.strip_prefix(BOILERPLATE_PREFIX) {
        Some(rest) => rest.trim(),
        None => text,
    };

    let filtered: String = text
        .chars()
        .filter(|&c| c.is_alphanumeric() || c.is_whitespace() || PERMITTED_PUNCTUATION.contains(&c))
        .collect();

    // Double quotes must never reach the prompt.
    let filtered = filtered.replace('"', "'");

    filtered
        .split("\n\n")
        .map(|para| MULTI_SPACE.replace_all(para, " ").trim().to_string())
        .filter(|para| !para.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
