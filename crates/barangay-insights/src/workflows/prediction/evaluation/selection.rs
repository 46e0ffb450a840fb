use std::cmp::Ordering;

use super::rules::EventTally;

/// Normalized score an event needs to be recommended.
pub const SELECTION_THRESHOLD: f64 = 50.0;

/// Rescale against the run's maximum, rounded to two decimals.
pub fn normalize_score(raw_score: f64, max_score: f64) -> f64 {
    if max_score <= 0.0 {
        return 0.0;
    }
    round_to(raw_score / max_score * 100.0, 2)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Events at or above the threshold, highest score first; ties keep encounter order.
pub(crate) fn select_events(tallies: &[EventTally], max_score: f64) -> Vec<(&EventTally, f64)> {
    let mut selected: Vec<(&EventTally, f64)> = tallies
        .iter()
        .map(|tally| (tally, normalize_score(tally.raw_score, max_score)))
        .filter(|(_, score)| *score >= SELECTION_THRESHOLD)
        .collect();

    selected.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    selected
}
