//! One-sentence document summary from per-label counts.

use lexclause_core::ClauseRecord;

pub const EMPTY_SUMMARY: &str = "No clauses found to summarize.";

/// Count clauses per label, in order of first appearance.
pub fn label_counts(records: &[ClauseRecord]) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for record in records {
        let label = record.label_or_unknown();
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    counts
}

/// e.g. "This document contains 2 Termination clauses, 1 Confidentiality clause."
pub fn summarize_document(records: &[ClauseRecord]) -> String {
    if records.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    let parts: Vec<String> = label_counts(records)
        .into_iter()
        .map(|(label, count)| {
            let plural = if count > 1 { "s" } else { "" };
            format!("{count} {label} clause{plural}")
        })
        .collect();

    format!("This document contains {}.", parts.join(", "))
}
