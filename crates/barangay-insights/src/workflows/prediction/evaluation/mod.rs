mod budget;
mod rules;
mod selection;

pub use budget::approximate_budget;
pub use rules::{condition_tokens, ConditionToken, EventTally, ScoreComponent};
pub use selection::{normalize_score, SELECTION_THRESHOLD};

pub(crate) use selection::round_to;

use super::domain::{EventRule, IndicatorSet, Prediction};
use serde::Serialize;

pub const PREDICTION_REASON: &str = "Based on socioeconomic and weather risk indicators";

/// Stateless evaluator turning rule rows and indicators into ranked predictions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationEngine;

impl EvaluationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        rules: &[EventRule],
        indicators: &IndicatorSet,
        annual_budget: f64,
    ) -> EvaluationOutcome {
        let tallies = rules::tally_rules(rules, indicators);
        let max_score = tallies.max_score();

        let predictions = selection::select_events(&tallies.tallies, max_score)
            .into_iter()
            .map(|(tally, normalized_score)| Prediction {
                event: tally.event.clone(),
                normalized_score,
                raw_score: tally.raw_score,
                approx_budget: approximate_budget(annual_budget, normalized_score),
                reason: PREDICTION_REASON,
                description: tallies.description(&tally.event),
                factors: tally.factors(),
            })
            .collect();

        let scores = tallies
            .tallies
            .iter()
            .map(|tally| EventScore {
                event: tally.event.clone(),
                raw_score: tally.raw_score,
                normalized_score: normalize_score(tally.raw_score, max_score),
                components: tally.components.clone(),
            })
            .collect();

        EvaluationOutcome {
            max_score,
            scores,
            predictions,
        }
    }
}

/// Score of every event in the run, selected or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventScore {
    pub event: String,
    pub raw_score: f64,
    pub normalized_score: f64,
    pub components: Vec<ScoreComponent>,
}

/// Evaluation output describing every event's score and the ranked selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationOutcome {
    pub max_score: f64,
    pub scores: Vec<EventScore>,
    pub predictions: Vec<Prediction>,
}
