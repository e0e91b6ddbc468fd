//! Human-readable and JSON rendering of a classification outcome.

use lexclause_core::{ClassificationOutcome, ClauseRecord};

const NOT_AVAILABLE: &str = "N/A";

/// Pretty-printed JSON of the whole outcome.
pub fn render_json(outcome: &ClassificationOutcome) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Plain-text report: summary, metadata, then one block per record.
pub fn render_text(outcome: &ClassificationOutcome) -> String {
    if let Some(error) = &outcome.error {
        return format!("Error: {error}");
    }

    let mut lines: Vec<String> = Vec::new();

    if let Some(summary) = &outcome.document_summary {
        lines.push(format!("Document Summary: {summary}"));
        lines.push(String::new());
    }

    if let Some(meta) = &outcome.metadata {
        lines.push(format!("Model: {}", meta.model));
        lines.push(format!("Clause Types: {}", meta.clause_types.join(", ")));
        lines.push(format!("Clauses Found: {}", meta.clause_count));
        lines.push(String::new());
    }

    if outcome.results.is_empty() {
        lines.push("No clauses were classified.".into());
    } else {
        lines.push("Classification Results:".into());
        for (i, record) in outcome.results.iter().enumerate() {
            push_record(&mut lines, i + 1, record);
        }
    }

    lines.join("\n")
}

// ── Record block ──

fn push_record(lines: &mut Vec<String>, position: usize, record: &ClauseRecord) {
    let confidence = record
        .confidence
        .map(|c| c.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.into());
    let level = record
        .confidence_level
        .map(|l| l.as_str())
        .unwrap_or(NOT_AVAILABLE);

    lines.push(String::new());
    lines.push(format!(
        "[{position}] {} (Confidence: {confidence} - {level})",
        record.label_or_unknown()
    ));
    lines.push(format!("Clause: \"{}\"", record.clause));
    let summary = if record.summary.is_empty() {
        NOT_AVAILABLE
    } else {
        record.summary.as_str()
    };
    lines.push(format!("Summary: {summary}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexclause_core::{ConfidenceLevel, OutcomeMetadata};

    fn outcome() -> ClassificationOutcome {
        ClassificationOutcome::success(
            vec![
                ClauseRecord::new(
                    "This agreement shall terminate upon 30 days written notice.",
                    "Termination",
                    0.95,
                    "Either party can end the agreement with 30 days notice.",
                )
                .with_level(ConfidenceLevel::VeryHigh),
                ClauseRecord {
                    clause: "Unscored text".into(),
                    label: None,
                    confidence: None,
                    confidence_level: None,
                    summary: String::new(),
                },
            ],
            "This document contains 1 Termination clause, 1 Unknown clause.".into(),
            OutcomeMetadata {
                model: "gpt-4.1".into(),
                clause_count: 2,
                clause_types: vec!["Termination".into(), "Liability".into()],
            },
        )
    }

    #[test]
    fn renders_full_report() {
        let text = render_text(&outcome());
        let expected = "\
Document Summary: This document contains 1 Termination clause, 1 Unknown clause.

Model: gpt-4.1
Clause Types: Termination, Liability
Clauses Found: 2

Classification Results:

[1] Termination (Confidence: 0.95 - Very High)
Clause: \"This agreement shall terminate upon 30 days written notice.\"
Summary: Either party can end the agreement with 30 days notice.

[2] Unknown (Confidence: N/A - N/A)
Clause: \"Unscored text\"
Summary: N/A";
        assert_eq!(text, expected);
    }

    #[test]
    fn error_short_circuits() {
        let text = render_text(&ClassificationOutcome::failure("Empty text provided"));
        assert_eq!(text, "Error: Empty text provided");
    }

    #[test]
    fn empty_results_are_called_out() {
        let mut empty = outcome();
        empty.results.clear();
        let text = render_text(&empty);
        assert!(text.ends_with("No clauses were classified."), "{text}");
        assert!(!text.contains("Classification Results:"));
    }

    #[test]
    fn json_is_pretty_and_complete() {
        let json = render_json(&outcome()).unwrap();
        assert!(json.contains("\n  \"results\": ["));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["results"][0]["confidence_level"], "Very High");
        assert_eq!(value["metadata"]["clause_count"], 2);
        assert_eq!(value["error"], serde_json::Value::Null);
    }
}
