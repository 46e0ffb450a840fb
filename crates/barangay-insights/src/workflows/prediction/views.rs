use serde::Serialize;

use super::domain::{BarangayProfile, IndicatorSet, Prediction};
use super::evaluation::{round_to, EventScore};
use crate::workflows::weather::{MonthlyRisk, WeatherSource};

/// Display view of one barangay's indicators. Rates carry two decimals, weather figures one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarangaySummary {
    pub total_population: u64,
    pub total_households: u64,
    pub low_income_rate: f64,
    pub waste_problem_rate: f64,
    pub health_issue_rate: f64,
    pub youth_enrollment_rate: f64,
    pub flood_prone: bool,
    pub annual_budget: f64,
    pub avg_rainfall_mm: f64,
    pub avg_temperature_c: f64,
    pub dengue_risk: f64,
    pub flood_risk: f64,
    pub heat_risk: f64,
    pub drought_risk: f64,
}

impl BarangaySummary {
    pub fn new(profile: &BarangayProfile, indicators: &IndicatorSet) -> Self {
        Self {
            total_population: profile.total_population,
            total_households: profile.total_households,
            low_income_rate: round_to(indicators.low_income_rate, 2),
            waste_problem_rate: round_to(indicators.waste_problem_rate, 2),
            health_issue_rate: round_to(indicators.health_issue_rate, 2),
            youth_enrollment_rate: round_to(indicators.youth_enrollment_rate, 2),
            flood_prone: indicators.flood_prone,
            annual_budget: profile.annual_budget,
            avg_rainfall_mm: round_to(indicators.avg_rainfall, 1),
            avg_temperature_c: round_to(indicators.avg_temp, 1),
            dengue_risk: round_to(indicators.dengue_risk, 1),
            flood_risk: round_to(indicators.flood_risk, 1),
            heat_risk: round_to(indicators.heat_risk, 1),
            drought_risk: round_to(indicators.drought_risk, 1),
        }
    }
}

/// Full result for one barangay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarangayAssessment {
    pub barangay: String,
    pub weather_source: WeatherSource,
    pub summary: BarangaySummary,
    #[serde(skip)]
    pub indicators: IndicatorSet,
    pub predictions: Vec<Prediction>,
    pub scores: Vec<EventScore>,
    pub monthly_risk: Vec<MonthlyRisk>,
}

/// Per-barangay slot of a multi-target run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BarangayOutcome {
    Evaluated(BarangayAssessment),
    Failed { error: String },
}

impl BarangayOutcome {
    pub fn assessment(&self) -> Option<&BarangayAssessment> {
        match self {
            Self::Evaluated(assessment) => Some(assessment),
            Self::Failed { .. } => None,
        }
    }
}
