use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{BarangayProfile, EventRule, HouseholdId, IndicatorSet};
use super::evaluation::EvaluationEngine;
use super::indicators::aggregate_households;
use super::repository::{RecordStore, RepositoryError};
use super::views::{BarangayAssessment, BarangayOutcome, BarangaySummary};
use crate::workflows::census::matching_key;
use crate::workflows::weather::{monthly_forecast, WeatherSnapshot};

/// Service composing the record store, indicator aggregation and the rule engine.
///
/// Both entry points are pure functions of the store contents and the weather snapshot
/// handed in by the caller.
pub struct PredictionService<S> {
    store: Arc<S>,
    engine: EvaluationEngine,
}

impl<S> PredictionService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            engine: EvaluationEngine::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Indicators and ranked predictions for one barangay.
    pub fn evaluate(
        &self,
        barangay: &str,
        weather: &WeatherSnapshot,
    ) -> Result<BarangayAssessment, PredictionServiceError> {
        let profile = self.store.fetch_barangay(barangay)?.ok_or_else(|| {
            PredictionServiceError::BarangayNotFound {
                barangay: barangay.to_string(),
            }
        })?;
        let rules = self.store.fetch_event_rules()?;

        self.assess(&profile, &rules, weather)
    }

    /// Evaluate every barangay in isolation. A failing barangay yields a `Failed` slot and
    /// the remaining ones still run; only listing profiles or rules aborts the whole run.
    /// Profiles whose names match an earlier one are skipped with a warning, so each slot is
    /// the same profile `evaluate` resolves.
    pub fn evaluate_all(
        &self,
        weather: &WeatherSnapshot,
    ) -> Result<BTreeMap<String, BarangayOutcome>, PredictionServiceError> {
        let profiles = self.store.fetch_barangays()?;
        let rules = self.store.fetch_event_rules()?;

        let mut outcomes = BTreeMap::new();
        let mut seen = HashSet::new();
        for profile in &profiles {
            if !seen.insert(matching_key(&profile.name)) {
                warn!(
                    barangay = %profile.name,
                    annual_budget = profile.annual_budget,
                    "duplicate barangay profile skipped; the first profile is evaluated"
                );
                continue;
            }

            let outcome = match self.assess(profile, &rules, weather) {
                Ok(assessment) => BarangayOutcome::Evaluated(assessment),
                Err(err) => {
                    warn!(barangay = %profile.name, error = %err, "barangay evaluation failed");
                    BarangayOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
            outcomes.insert(profile.name.clone(), outcome);
        }

        info!(
            barangays = outcomes.len(),
            weather_source = ?weather.source,
            "evaluated all barangays"
        );
        Ok(outcomes)
    }

    fn assess(
        &self,
        profile: &BarangayProfile,
        rules: &[EventRule],
        weather: &WeatherSnapshot,
    ) -> Result<BarangayAssessment, PredictionServiceError> {
        let census = self.store.fetch_census_records(&profile.name)?;
        let household_ids: Vec<HouseholdId> = census.iter().map(|record| record.id).collect();
        let members = self.store.fetch_household_members(&household_ids)?;

        let household = aggregate_households(&census, &members);
        let indicators = IndicatorSet::compose(&household, profile.flood_prone, &weather.risk());
        debug!(
            barangay = %profile.name,
            households = census.len(),
            members = members.len(),
            counted_population = household.counted_population,
            low_income_rate = indicators.low_income_rate,
            waste_problem_rate = indicators.waste_problem_rate,
            health_issue_rate = indicators.health_issue_rate,
            youth_enrollment_rate = indicators.youth_enrollment_rate,
            "aggregated indicators"
        );

        let outcome = self
            .engine
            .evaluate(rules, &indicators, profile.annual_budget);
        info!(
            barangay = %profile.name,
            predictions = outcome.predictions.len(),
            max_score = outcome.max_score,
            weather_source = ?weather.source,
            "evaluated barangay"
        );

        Ok(BarangayAssessment {
            barangay: profile.name.clone(),
            weather_source: weather.source,
            summary: BarangaySummary::new(profile, &indicators),
            indicators,
            predictions: outcome.predictions,
            scores: outcome.scores,
            monthly_risk: monthly_forecast(&weather.series),
        })
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error("barangay not found: {barangay}")]
    BarangayNotFound { barangay: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
