//! Prompt templates for clause classification.

use std::fmt::Write;

pub const SYSTEM_PROMPT: &str =
    "You are an expert in legal contract analysis and clause classification.";

const SCORING_RUBRIC: &str = "\
- confidence: a float between 0 and 1 representing your confidence in this classification
  - 0.9-1.0: Very high confidence, clear and unambiguous classification
  - 0.7-0.9: High confidence, strong indicators of the category
  - 0.5-0.7: Moderate confidence, some indicators but potential ambiguity
  - 0.3-0.5: Low confidence, weak indicators or multiple possible categories
  - 0.0-0.3: Very low confidence, unclear or unusual clause";

const FEW_SHOT_EXAMPLES: &str = r#"Example 1:
Text: "This agreement shall terminate upon 30 days written notice by either party."
Classification: {
  "clause": "This agreement shall terminate upon 30 days written notice by either party.",
  "label": "Termination",
  "confidence": 0.95,
  "summary": "Either party can end the agreement with 30 days written notice."
}

Example 2:
Text: "All information shared during the course of this agreement shall be kept confidential for a period of 5 years."
Classification: {
  "clause": "All information shared during the course of this agreement shall be kept confidential for a period of 5 years.",
  "label": "Confidentiality",
  "confidence": 0.98,
  "summary": "Information shared must be kept secret for 5 years."
}

Example 3:
Text: "This agreement shall be governed by the laws of the State of California."
Classification: {
  "clause": "This agreement shall be governed by the laws of the State of California.",
  "label": "Governing Law",
  "confidence": 0.97,
  "summary": "California law applies to this agreement."
}"#;

/// Render the classification prompt for an ordered clause list.
///
/// Categories are joined with `", "`; clauses are enumerated from 1 with their
/// literal text. The output depends only on the inputs.
pub fn build_classification_prompt<C, T>(clauses: &[C], clause_types: &[T]) -> String
where
    C: AsRef<str>,
    T: AsRef<str>,
{
    let categories = clause_types
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<&str>>()
        .join(", ");

    let mut prompt = format!(
        "You are a legal assistant AI specialized in contract analysis. \
         Classify each clause into one of the following categories:\n\
         {categories}\n\
         \n\
         If a clause doesn't clearly fit any category, classify it as the closest match \
         and adjust the confidence score accordingly.\n\
         \n\
         For each clause, respond with a JSON object containing:\n\
         - clause: the original text of the clause\n\
         - label: the most appropriate category from the list above\n\
         {SCORING_RUBRIC}\n\
         - summary: a concise explanation of the clause in plain English\n\
         \n\
         Respond with a JSON object whose \"results\" key holds an array containing \
         one object for each clause.\n\
         \n\
         {FEW_SHOT_EXAMPLES}\n\
         \n\
         Clauses to classify:\n"
    );

    for (i, clause) in clauses.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = write!(prompt, "\n{}. {}", i + 1, clause.as_ref());
    }

    prompt
}
