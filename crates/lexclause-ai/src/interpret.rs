//! Model-response interpretation with layered recovery.
//!
//! Model output is unreliable in shape: sometimes a wrapped object, sometimes a
//! bare array, sometimes truncated or not JSON at all. [`interpret`] never fails.
//! It tries each strategy in [`STRATEGIES`] in order and returns the first that
//! yields records, falling back to a single synthetic whole-document record.
//!
//! | Order | Applies when | Produces |
//! |-------|--------------|----------|
//! | 1 | raw text parses as JSON | the records found in it |
//! | 2 | JSON parsed but held no records | placeholder windows over the input text |
//! | 3 | raw text is not JSON | records pattern-matched out of the text |
//! | 4 | nothing else worked | one synthetic "Legal Document" record |

use std::sync::LazyLock;

use lexclause_core::{ClauseRecord, ConfidenceLevel, RecoveryLimits};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// A loosely-typed record object as emitted by the model.
pub type RawRecord = Map<String, Value>;

pub const UNCLASSIFIED_LABEL: &str = "Unclassified Text";
pub const DOCUMENT_LABEL: &str = "Legal Document";
pub const DOCUMENT_SUMMARY: &str = "This is a legal document containing various clauses \
                                    related to contracts, agreements, or legal matters.";

const PLACEHOLDER_CONFIDENCE: f64 = 0.5;
const DOCUMENT_CONFIDENCE: f64 = 0.7;

/// `{"clause": "...", "label": "...", "confidence": N, "summary": "..."}`, tolerating
/// escaped quotes inside the string values.
static RECORD_TUPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{\s*"clause":\s*"((?:\\"|[^"])+)",\s*"label":\s*"((?:\\"|[^"])+)",\s*"confidence":\s*([\d\.]+),\s*"summary":\s*"((?:\\"|[^"])+)"\s*\}"#,
    )
    .unwrap()
});

/// Which layer produced the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySource {
    Parsed,
    Placeholder,
    Extracted,
    Synthetic,
}

impl RecoverySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parsed => "parsed",
            Self::Placeholder => "placeholder",
            Self::Extracted => "extracted",
            Self::Synthetic => "synthetic",
        }
    }
}

/// Records recovered from one model response, always non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub records: Vec<ClauseRecord>,
    pub source: RecoverySource,
}

/// Everything a strategy may look at.
pub struct ResponseContext<'a> {
    raw: &'a str,
    source_text: &'a str,
    parsed: Result<Value, serde_json::Error>,
    limits: RecoveryLimits,
}

impl<'a> ResponseContext<'a> {
    /// `raw` is the model output; `source_text` is the original, un-normalised input.
    pub fn new(raw: &'a str, source_text: &'a str, limits: RecoveryLimits) -> Self {
        Self {
            raw,
            source_text,
            parsed: serde_json::from_str(raw),
            limits,
        }
    }
}

type Strategy = fn(&ResponseContext<'_>) -> Option<Vec<ClauseRecord>>;

/// Recovery layers in the order they are attempted.
pub const STRATEGIES: &[(RecoverySource, Strategy)] = &[
    (RecoverySource::Parsed, parsed_records),
    (RecoverySource::Placeholder, placeholder_windows),
    (RecoverySource::Extracted, extracted_tuples),
];

/// Interpret a raw model response.
pub fn interpret(raw: &str, source_text: &str, limits: RecoveryLimits) -> Interpretation {
    let ctx = ResponseContext::new(raw, source_text, limits);

    let (source, records) = STRATEGIES
        .iter()
        .find_map(|(source, strategy)| strategy(&ctx).map(|records| (*source, records)))
        .unwrap_or_else(|| (RecoverySource::Synthetic, synthetic_document(&ctx)));

    debug!(
        source = source.as_str(),
        count = records.len(),
        "interpreted model response"
    );
    Interpretation { records, source }
}

/// Locate the record objects inside a parsed response.
///
/// Checked in order: a `results` array, a bare array, a single object with both
/// `clause` and `label`, then the first non-empty array of objects among the
/// object's values. Non-object array items are skipped.
pub fn select_records(value: &Value) -> Vec<RawRecord> {
    if let Some(Value::Array(items)) = value.get("results") {
        return objects(items);
    }

    match value {
        Value::Array(items) => objects(items),
        Value::Object(map) if map.contains_key("clause") && map.contains_key("label") => {
            vec![map.clone()]
        }
        Value::Object(map) => map
            .values()
            .find_map(|v| match v {
                Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                    Some(objects(items))
                }
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn objects(items: &[Value]) -> Vec<RawRecord> {
    let records: Vec<RawRecord> = items
        .iter()
        .filter_map(|item| item.as_object().cloned())
        .collect();
    if records.len() < items.len() {
        debug!(
            skipped = items.len() - records.len(),
            "skipped non-object result items"
        );
    }
    records
}

// ── Strategies ──

fn parsed_records(ctx: &ResponseContext<'_>) -> Option<Vec<ClauseRecord>> {
    let value = ctx.parsed.as_ref().ok()?;
    let raw_records = select_records(value);
    if raw_records.is_empty() {
        return None;
    }
    Some(raw_records.iter().map(ClauseRecord::from_raw).collect())
}

fn placeholder_windows(ctx: &ResponseContext<'_>) -> Option<Vec<ClauseRecord>> {
    let value = ctx.parsed.as_ref().ok()?;

    warn!("could not find clause results in model response");
    if let Some(error) = value.get("error") {
        warn!(error = %error, "model returned an error");
    }

    let window = ctx.limits.chunk_window.max(1);
    let text = ctx.source_text;
    if text.chars().count() <= window {
        return Some(vec![placeholder(text.to_string(), "Unclassified legal text".into())]);
    }

    let chars: Vec<char> = text.chars().collect();
    let records = chars
        .chunks(window)
        .take(ctx.limits.max_chunks.max(1))
        .enumerate()
        .map(|(i, chunk)| {
            placeholder(
                chunk.iter().collect(),
                format!("Part {} of unclassified legal text", i + 1),
            )
        })
        .collect();
    Some(records)
}

fn placeholder(clause: String, summary: String) -> ClauseRecord {
    ClauseRecord::new(clause, UNCLASSIFIED_LABEL, PLACEHOLDER_CONFIDENCE, summary)
        .with_level(ConfidenceLevel::Moderate)
}

fn extracted_tuples(ctx: &ResponseContext<'_>) -> Option<Vec<ClauseRecord>> {
    let err = ctx.parsed.as_ref().err()?;
    warn!(error = %err, "model response is not valid JSON");
    debug!(raw = ctx.raw, "unparseable response");

    let mut records = Vec::new();
    for caps in RECORD_TUPLE.captures_iter(ctx.raw) {
        let confidence: f64 = match caps[3].parse() {
            Ok(c) => c,
            Err(e) => {
                warn!(confidence = &caps[3], error = %e, "unreadable confidence in partial result");
                return None;
            }
        };
        records.push(
            ClauseRecord::new(&caps[1], &caps[2], confidence, &caps[4])
                .with_level(ConfidenceLevel::High),
        );
    }

    if records.is_empty() {
        return None;
    }
    info!(count = records.len(), "recovered partial results");
    Some(records)
}

fn synthetic_document(ctx: &ResponseContext<'_>) -> Vec<ClauseRecord> {
    warn!("falling back to a single whole-document record");
    let clause = truncate_chars(ctx.source_text, ctx.limits.truncate_at);
    vec![
        ClauseRecord::new(clause, DOCUMENT_LABEL, DOCUMENT_CONFIDENCE, DOCUMENT_SUMMARY)
            .with_level(ConfidenceLevel::High),
    ]
}

/// First `max_chars` characters, with a trailing ellipsis when anything was cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const INPUT: &str = "This agreement shall terminate upon 30 days written notice.";

    fn run(raw: &str) -> Interpretation {
        interpret(raw, INPUT, RecoveryLimits::default())
    }

    #[test]
    fn results_wrapper_is_extracted_unchanged() {
        let items = json!([
            { "clause": "A", "label": "Termination", "confidence": 0.95, "summary": "s1" },
            { "clause": "B", "label": "Liability", "confidence": 0.6, "summary": "s2", "note": 1 }
        ]);
        let raw = json!({ "results": items.clone() });

        let selected = select_records(&raw);
        assert_eq!(Value::Array(selected.into_iter().map(Value::Object).collect()), items);

        let result = run(&raw.to_string());
        assert_eq!(result.source, RecoverySource::Parsed);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[1].label.as_deref(), Some("Liability"));
    }

    #[test]
    fn bare_array_is_extracted_unchanged() {
        let items = json!([{ "clause": "A", "label": "Termination", "confidence": 0.9, "summary": "s" }]);
        let selected = select_records(&items);
        assert_eq!(Value::Array(selected.into_iter().map(Value::Object).collect()), items);
        assert_eq!(run(&items.to_string()).source, RecoverySource::Parsed);
    }

    #[test]
    fn single_record_object_is_wrapped() {
        let raw = json!({ "clause": INPUT, "label": "Termination", "confidence": 0.95, "summary": "s" });
        let result = run(&raw.to_string());
        assert_eq!(result.source, RecoverySource::Parsed);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].clause, INPUT);
    }

    #[test]
    fn first_array_of_objects_is_used() {
        let raw = r#"{
            "count": 2,
            "tags": ["a", "b"],
            "classifications": [{ "clause": "A", "label": "Liability" }],
            "other": [{ "clause": "B", "label": "Termination" }]
        }"#;
        let result = run(raw);
        assert_eq!(result.source, RecoverySource::Parsed);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].clause, "A");
    }

    #[test]
    fn non_object_items_are_skipped() {
        let raw = r#"[1, "two", { "clause": "A", "label": "Liability" }]"#;
        let result = run(raw);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].clause, "A");
    }

    #[test]
    fn json_without_records_yields_one_placeholder_for_short_text() {
        let result = run(r#"{ "error": "could not classify" }"#);
        assert_eq!(result.source, RecoverySource::Placeholder);
        assert_eq!(result.records.len(), 1);

        let record = &result.records[0];
        assert_eq!(record.clause, INPUT);
        assert_eq!(record.label.as_deref(), Some(UNCLASSIFIED_LABEL));
        assert_eq!(record.confidence, Some(0.5));
        assert_eq!(record.confidence_level, Some(ConfidenceLevel::Moderate));
        assert_eq!(record.summary, "Unclassified legal text");
    }

    #[test]
    fn empty_results_array_yields_placeholder() {
        let result = run(r#"{ "results": [] }"#);
        assert_eq!(result.source, RecoverySource::Placeholder);
        assert_eq!(result.records.len(), 1);
    }

    #[test]
    fn placeholder_windows_over_long_text_are_capped() {
        let text = "x".repeat(700);
        let result = interpret("{}", &text, RecoveryLimits::default());
        assert_eq!(result.records.len(), 3);
        for (i, record) in result.records.iter().enumerate() {
            assert_eq!(record.clause.chars().count(), 200);
            assert_eq!(record.summary, format!("Part {} of unclassified legal text", i + 1));
        }

        let text = "y".repeat(350);
        let result = interpret("[]", &text, RecoveryLimits::default());
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[1].clause.len(), 150);
    }

    #[test]
    fn placeholder_windows_count_characters_not_bytes() {
        let text = "é".repeat(201);
        let result = interpret("{}", &text, RecoveryLimits::default());
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[1].clause, "é");
    }

    #[test]
    fn placeholder_limits_are_configurable() {
        let limits = RecoveryLimits {
            chunk_window: 10,
            max_chunks: 2,
            truncate_at: 1000,
        };
        let result = interpret("{}", &"z".repeat(25), limits);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].clause.len(), 10);
    }

    #[test]
    fn pattern_extraction_recovers_exact_tuples() {
        let raw = r#"Here you go: ```json
        [{"clause": "Either party may terminate.", "label": "Termination", "confidence": 0.92, "summary": "Termination right."},
         {"clause": "He said \"no\".", "label": "Liability", "confidence": 0.4, "summary": "Quoted."}
        ``` (truncated"#;
        let result = run(raw);
        assert_eq!(result.source, RecoverySource::Extracted);
        assert_eq!(result.records.len(), 2);

        let first = &result.records[0];
        assert_eq!(first.clause, "Either party may terminate.");
        assert_eq!(first.label.as_deref(), Some("Termination"));
        assert_eq!(first.confidence, Some(0.92));
        assert_eq!(first.confidence_level, Some(ConfidenceLevel::High));
        assert_eq!(first.summary, "Termination right.");

        assert_eq!(result.records[1].clause, r#"He said \"no\"."#);
        assert_eq!(result.records[1].confidence, Some(0.4));
    }

    #[test]
    fn truncated_json_recovers_complete_tuples() {
        let raw = r#"{"results": [{"clause": "Pay monthly.", "label": "Payment Terms", "confidence": 0.8, "summary": "Monthly payments."}, {"clause": "Keep se"#;
        let result = run(raw);
        assert_eq!(result.source, RecoverySource::Extracted);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].label.as_deref(), Some("Payment Terms"));
    }

    #[test]
    fn unparseable_text_yields_one_synthetic_record() {
        let result = run("I'm sorry, I can't help with that.");
        assert_eq!(result.source, RecoverySource::Synthetic);
        assert_eq!(result.records.len(), 1);

        let record = &result.records[0];
        assert_eq!(record.label.as_deref(), Some(DOCUMENT_LABEL));
        assert_eq!(record.clause, INPUT);
        assert_eq!(record.confidence, Some(0.7));
        assert_eq!(record.summary, DOCUMENT_SUMMARY);
    }

    #[test]
    fn unreadable_tuple_confidence_falls_back_to_synthetic() {
        let raw = r#"not json {"clause": "A", "label": "B", "confidence": 1.2.3, "summary": "C"}"#;
        let result = run(raw);
        assert_eq!(result.source, RecoverySource::Synthetic);
        assert_eq!(result.records.len(), 1);
    }

    #[test]
    fn synthetic_record_truncates_long_input() {
        let text = "w".repeat(1500);
        let result = interpret("<html>", &text, RecoveryLimits::default());
        let clause = &result.records[0].clause;
        assert_eq!(clause.len(), 1003);
        assert!(clause.ends_with("..."));

        let text = "v".repeat(1000);
        let result = interpret("<html>", &text, RecoveryLimits::default());
        assert_eq!(result.records[0].clause, text);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ééé", 2), "éé...");
        assert_eq!(truncate_chars("ab", 2), "ab");
    }
}
