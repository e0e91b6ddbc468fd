//! Confidence calibration: clamp, round, and assign a tier.

use lexclause_core::{ClauseRecord, ConfidenceLevel};

/// Clamp to `[0, 1]` and round to two decimal places. NaN maps to 0.
///
/// Rounding works on the exact stored value, ties to even, so `0.695` (stored
/// just below the tie) becomes `0.69`.
pub fn calibrate_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    let clamped = score.clamp(0.0, 1.0);
    format!("{clamped:.2}").parse().unwrap_or(clamped)
}

/// Calibrate every record that carries a confidence. Records without one are
/// left untouched. Applying this twice gives the same result as applying it once.
pub fn calibrate(records: &mut [ClauseRecord]) {
    for record in records.iter_mut() {
        if let Some(score) = record.confidence {
            let calibrated = calibrate_score(score);
            record.confidence = Some(calibrated);
            record.confidence_level = Some(ConfidenceLevel::from_score(calibrated));
        }
    }
}
