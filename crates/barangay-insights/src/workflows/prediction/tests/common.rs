use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::prediction::domain::{
    BarangayProfile, CensusRecord, EventRule, HouseholdId, HouseholdMember, IncomeBracket,
    IndicatorSet,
};
use crate::workflows::prediction::repository::{RecordSnapshot, RecordStore, RepositoryError};
use crate::workflows::prediction::service::PredictionService;
use crate::workflows::weather::{MonthlySeries, WeatherSnapshot};

pub(super) const SAN_JOSE: &str = "San Jose";
pub(super) const SANTA_CRUZ: &str = "Santa Cruz";

pub(super) fn profile(name: &str, flood_prone: bool, annual_budget: f64) -> BarangayProfile {
    BarangayProfile {
        name: name.to_string(),
        total_population: 1_200,
        total_households: 300,
        annual_budget,
        flood_prone,
    }
}

pub(super) fn census_record(id: u64, barangay: &str) -> CensusRecord {
    CensusRecord {
        id: HouseholdId(id),
        barangay: barangay.to_string(),
        garbage_disposal: Some("Collected".to_string()),
        segregate: Some("Yes".to_string()),
        ..CensusRecord::default()
    }
}

pub(super) fn member(household: u64, age: u32, income: Option<IncomeBracket>) -> HouseholdMember {
    HouseholdMember {
        household_id: Some(HouseholdId(household)),
        age: Some(age),
        monthly_income: income.map(|bracket| bracket.label().to_string()),
        ..HouseholdMember::default()
    }
}

pub(super) fn enrolled(mut member: HouseholdMember) -> HouseholdMember {
    member.currently_enrolled = Some("Yes".to_string());
    member
}

pub(super) fn rule(event: &str, condition: &str, score: f64, description: &str) -> EventRule {
    EventRule {
        event_name: event.to_string(),
        rule_condition: condition.to_string(),
        score,
        description: Some(description.to_string()).filter(|value| !value.is_empty()),
    }
}

pub(super) fn standard_rules() -> Vec<EventRule> {
    vec![
        rule(
            "Relief Drive",
            "flood_prone AND rain",
            40.0,
            "Pre-position relief goods before the wet season",
        ),
        rule("Livelihood Seminar", "low_income", 30.0, "Skills training"),
        rule("Clean-up Drive", "waste", 25.0, "Community clean-up"),
        rule("Medical Mission", "disease", 20.0, "Free consultations"),
    ]
}

/// San Jose: flood prone, two poor households burning waste, one with a sick member.
/// Santa Cruz: no census submissions at all.
pub(super) fn sample_snapshot() -> RecordSnapshot {
    let mut burning = census_record(1, SAN_JOSE);
    burning.garbage_disposal = Some("Burning".to_string());
    burning.disease_1 = Some("Dengue".to_string());
    let mut dumping = census_record(2, SAN_JOSE);
    dumping.segregate = Some("No".to_string());

    RecordSnapshot::new(
        vec![
            profile(SAN_JOSE, true, 1_000_000.0),
            profile(SANTA_CRUZ, false, 500_000.0),
        ],
        vec![burning, dumping, census_record(3, SAN_JOSE)],
        vec![
            member(1, 41, Some(IncomeBracket::UpTo5000)),
            enrolled(member(1, 12, None)),
            member(2, 35, Some(IncomeBracket::From5001To10000)),
            member(2, 17, None),
            member(3, 50, Some(IncomeBracket::Above20000)),
        ],
        standard_rules(),
    )
}

pub(super) fn rainy_weather() -> WeatherSnapshot {
    let series =
        MonthlySeries::new(vec![500.0; 12], vec![33.0; 12]).expect("twelve monthly readings");
    WeatherSnapshot::live(series)
}

pub(super) fn indicators() -> IndicatorSet {
    IndicatorSet {
        low_income_rate: 0.0,
        waste_problem_rate: 0.0,
        health_issue_rate: 0.0,
        youth_enrollment_rate: 0.0,
        flood_prone: false,
        dengue_risk: 0.0,
        flood_risk: 0.0,
        heat_risk: 0.0,
        drought_risk: 0.0,
        avg_rainfall: 300.0,
        avg_temp: 30.0,
    }
}

pub(super) fn build_service() -> PredictionService<RecordSnapshot> {
    PredictionService::new(Arc::new(sample_snapshot()))
}

pub(super) struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn fetch_barangay(&self, _name: &str) -> Result<Option<BarangayProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch_barangays(&self) -> Result<Vec<BarangayProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch_census_records(&self, _barangay: &str) -> Result<Vec<CensusRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch_household_members(
        &self,
        _household_ids: &[HouseholdId],
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch_event_rules(&self) -> Result<Vec<EventRule>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

/// Serves the sample snapshot but fails census lookups for one barangay.
pub(super) struct FlakyCensusStore {
    pub(super) inner: RecordSnapshot,
    pub(super) failing: &'static str,
}

impl RecordStore for FlakyCensusStore {
    fn fetch_barangay(&self, name: &str) -> Result<Option<BarangayProfile>, RepositoryError> {
        self.inner.fetch_barangay(name)
    }

    fn fetch_barangays(&self) -> Result<Vec<BarangayProfile>, RepositoryError> {
        self.inner.fetch_barangays()
    }

    fn fetch_census_records(&self, barangay: &str) -> Result<Vec<CensusRecord>, RepositoryError> {
        if barangay == self.failing {
            return Err(RepositoryError::Unavailable("census table locked".to_string()));
        }
        self.inner.fetch_census_records(barangay)
    }

    fn fetch_household_members(
        &self,
        household_ids: &[HouseholdId],
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        self.inner.fetch_household_members(household_ids)
    }

    fn fetch_event_rules(&self) -> Result<Vec<EventRule>, RepositoryError> {
        self.inner.fetch_event_rules()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
