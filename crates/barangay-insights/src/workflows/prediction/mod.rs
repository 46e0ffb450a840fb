//! Community risk and event-priority prediction.
//!
//! Pipeline per barangay: census records and household members feed the indicator
//! aggregator, the weather snapshot feeds the risk estimator, and the rule engine scores every
//! event rule against the merged [`IndicatorSet`]. Scores are rescaled against the run's
//! maximum, events scoring at least 50 are recommended, and each gets a budget estimate.

pub mod domain;
pub(crate) mod evaluation;
pub mod indicators;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    BarangayProfile, CensusRecord, EventRule, HouseholdId, HouseholdIndicators, HouseholdMember,
    IncomeBracket, IndicatorSet, Prediction,
};
pub use evaluation::{
    approximate_budget, condition_tokens, normalize_score, ConditionToken, EvaluationEngine,
    EvaluationOutcome, EventScore, EventTally, ScoreComponent, PREDICTION_REASON,
    SELECTION_THRESHOLD,
};
pub use indicators::aggregate_households;
pub use repository::{RecordSnapshot, RecordStore, RepositoryError};
pub use router::{prediction_router, PredictionContext};
pub use service::{PredictionService, PredictionServiceError};
pub use views::{BarangayAssessment, BarangayOutcome, BarangaySummary};
