use serde::{Deserialize, Serialize};

use crate::workflows::weather::WeatherRisk;

/// Identifier of a surveyed household (the census submission id).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct HouseholdId(pub u64);

/// Administrative profile of one barangay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarangayProfile {
    pub name: String,
    pub total_population: u64,
    pub total_households: u64,
    pub annual_budget: f64,
    pub flood_prone: bool,
}

/// One census submission; `id` doubles as the household identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CensusRecord {
    pub id: HouseholdId,
    pub barangay: String,
    pub garbage_disposal: Option<String>,
    pub segregate: Option<String>,
    pub disease_1: Option<String>,
    pub disease_2: Option<String>,
    pub disease_3: Option<String>,
}

impl CensusRecord {
    pub fn reports_disease(&self) -> bool {
        [&self.disease_1, &self.disease_2, &self.disease_3]
            .into_iter()
            .any(|disease| disease.as_deref().is_some_and(|value| !value.trim().is_empty()))
    }
}

/// Member row of a household. Missing values follow the default-on-missing policy:
/// no age counts as 0, no income label leaves the member unclassified.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HouseholdMember {
    pub household_id: Option<HouseholdId>,
    pub age: Option<u32>,
    pub monthly_income: Option<String>,
    pub currently_enrolled: Option<String>,
    pub sex: Option<String>,
    pub employment_status: Option<String>,
}

impl HouseholdMember {
    pub fn age_or_zero(&self) -> u32 {
        self.age.unwrap_or(0)
    }

    /// Income label when one was provided.
    pub fn income_label(&self) -> Option<&str> {
        self.monthly_income
            .as_deref()
            .filter(|label| !label.trim().is_empty())
    }

    pub fn is_enrolled(&self) -> bool {
        self.currently_enrolled
            .as_deref()
            .is_some_and(|value| value.trim() == "Yes")
    }
}

/// Scoring rule for one community event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRule {
    pub event_name: String,
    pub rule_condition: String,
    pub score: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Canonical monthly income brackets used by the census form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBracket {
    UpTo5000,
    From5001To10000,
    From10001To15000,
    From15001To20000,
    Above20000,
}

impl IncomeBracket {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::UpTo5000,
            Self::From5001To10000,
            Self::From10001To15000,
            Self::From15001To20000,
            Self::Above20000,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UpTo5000 => "₱5,000 and below",
            Self::From5001To10000 => "₱5,001 - ₱10,000",
            Self::From10001To15000 => "₱10,001 - ₱15,000",
            Self::From15001To20000 => "₱15,001 - ₱20,000",
            Self::Above20000 => "₱20,001 and above",
        }
    }

    /// Representative peso amount used when averaging household income.
    pub const fn representative_value(self) -> f64 {
        match self {
            Self::UpTo5000 => 5_000.0,
            Self::From5001To10000 => 10_000.0,
            Self::From10001To15000 => 15_000.0,
            Self::From15001To20000 => 20_000.0,
            Self::Above20000 => 25_000.0,
        }
    }

    /// Match a free-text label against the canonical brackets, lowest bracket first.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = normalize_income_label(label);
        if normalized.is_empty() {
            return None;
        }
        Self::ordered()
            .into_iter()
            .find(|bracket| normalized.contains(&normalize_income_label(bracket.label())))
    }
}

fn normalize_income_label(label: &str) -> String {
    label
        .replace('₱', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Every indicator the rule engine can test, scoped to one barangay and one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub low_income_rate: f64,
    pub waste_problem_rate: f64,
    pub health_issue_rate: f64,
    pub youth_enrollment_rate: f64,
    pub flood_prone: bool,
    pub dengue_risk: f64,
    pub flood_risk: f64,
    pub heat_risk: f64,
    pub drought_risk: f64,
    pub avg_rainfall: f64,
    pub avg_temp: f64,
}

impl IndicatorSet {
    pub fn compose(
        household: &HouseholdIndicators,
        flood_prone: bool,
        weather: &WeatherRisk,
    ) -> Self {
        Self {
            low_income_rate: household.low_income_rate,
            waste_problem_rate: household.waste_problem_rate,
            health_issue_rate: household.health_issue_rate,
            youth_enrollment_rate: household.youth_enrollment_rate,
            flood_prone,
            dengue_risk: weather.dengue_risk,
            flood_risk: weather.flood_risk,
            heat_risk: weather.heat_risk,
            drought_risk: weather.drought_risk,
            avg_rainfall: weather.avg_rainfall,
            avg_temp: weather.avg_temp,
        }
    }
}

/// Output of the indicator aggregator, before weather and profile data are merged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HouseholdIndicators {
    pub low_income_rate: f64,
    pub waste_problem_rate: f64,
    pub health_issue_rate: f64,
    pub youth_enrollment_rate: f64,
    /// Residents of households with at least one classified income label.
    pub counted_population: usize,
    pub counted_households: usize,
}

/// Recommended event surfaced to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub event: String,
    pub normalized_score: f64,
    pub raw_score: f64,
    pub approx_budget: f64,
    pub reason: &'static str,
    pub description: String,
    pub factors: Vec<&'static str>,
}
