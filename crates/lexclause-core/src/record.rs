//! Shared result types produced by the classification pipeline.
//!
//! Serialised as-is by both the HTTP boundary and the CLI's JSON output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discrete confidence tier derived from a continuous score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ConfidenceLevel {
    /// Band a score by inclusive lower bounds: 0.9, 0.7, 0.5, 0.3.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::VeryHigh
        } else if score >= 0.7 {
            Self::High
        } else if score >= 0.5 {
            Self::Moderate
        } else if score >= 0.3 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Parse the display form (case-insensitive, surrounding whitespace ignored).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        [
            Self::VeryLow,
            Self::Low,
            Self::Moderate,
            Self::High,
            Self::VeryHigh,
        ]
        .into_iter()
        .find(|level| level.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classified (or synthesised) clause.
///
/// `confidence` and `label` are optional because model output is loosely typed:
/// a record without a score passes through calibration untouched, and a record
/// without a label is counted as `Unknown` in the document summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseRecord {
    pub clause: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<ConfidenceLevel>,
    #[serde(default)]
    pub summary: String,
}

impl ClauseRecord {
    pub fn new(
        clause: impl Into<String>,
        label: impl Into<String>,
        confidence: f64,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            clause: clause.into(),
            label: Some(label.into()),
            confidence: Some(confidence),
            confidence_level: None,
            summary: summary.into(),
        }
    }

    /// Attach a tier marker ahead of calibration.
    pub fn with_level(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = Some(level);
        self
    }

    /// Build a record from a loosely-typed JSON object returned by the model.
    ///
    /// Scalars are coerced to text; a numeric string is accepted as a score.
    /// Unknown keys are ignored.
    pub fn from_raw(raw: &Map<String, Value>) -> Self {
        Self {
            clause: raw.get("clause").and_then(as_text).unwrap_or_default(),
            label: raw.get("label").and_then(as_text),
            confidence: raw.get("confidence").and_then(as_score),
            confidence_level: raw
                .get("confidence_level")
                .and_then(Value::as_str)
                .and_then(ConfidenceLevel::parse),
            summary: raw.get("summary").and_then(as_text).unwrap_or_default(),
        }
    }

    /// Label used for aggregation.
    pub fn label_or_unknown(&self) -> &str {
        self.label.as_deref().unwrap_or("Unknown")
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Metadata describing how a classification was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMetadata {
    pub model: String,
    /// Number of clauses submitted to the model (not the number of records returned).
    pub clause_count: usize,
    pub clause_types: Vec<String>,
}

/// Final result bundle for one classification request.
///
/// Either `results` is non-empty with a `document_summary`, or `error` explains
/// why classification could not proceed and `results` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    #[serde(default)]
    pub results: Vec<ClauseRecord>,
    #[serde(default)]
    pub document_summary: Option<String>,
    #[serde(default)]
    pub metadata: Option<OutcomeMetadata>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ClassificationOutcome {
    pub fn success(
        results: Vec<ClauseRecord>,
        document_summary: String,
        metadata: OutcomeMetadata,
    ) -> Self {
        Self {
            results,
            document_summary: Some(document_summary),
            metadata: Some(metadata),
            error: None,
        }
    }

    /// Error-shaped outcome: empty results plus a human-readable message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
