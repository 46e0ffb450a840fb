const MIN_BUDGET_SHARE: f64 = 0.2;
const MAX_BUDGET_SHARE: f64 = 0.6;
const BUDGET_ROUNDING: f64 = 1_000.0;

/// Map a 0-100 score onto 20%-60% of the annual budget, rounded to the nearest thousand.
pub fn approximate_budget(annual_budget: f64, normalized_score: f64) -> f64 {
    let share =
        MIN_BUDGET_SHARE + (MAX_BUDGET_SHARE - MIN_BUDGET_SHARE) * normalized_score / 100.0;
    (annual_budget * share / BUDGET_ROUNDING).round() * BUDGET_ROUNDING
}
