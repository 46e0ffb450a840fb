use std::collections::HashSet;

use crate::workflows::census::same_barangay;

use super::domain::{BarangayProfile, CensusRecord, EventRule, HouseholdId, HouseholdMember};

/// Read-only record store consumed by the prediction engine.
pub trait RecordStore: Send + Sync {
    fn fetch_barangay(&self, name: &str) -> Result<Option<BarangayProfile>, RepositoryError>;
    fn fetch_barangays(&self) -> Result<Vec<BarangayProfile>, RepositoryError>;
    fn fetch_census_records(&self, barangay: &str) -> Result<Vec<CensusRecord>, RepositoryError>;
    fn fetch_household_members(
        &self,
        household_ids: &[HouseholdId],
    ) -> Result<Vec<HouseholdMember>, RepositoryError>;
    fn fetch_event_rules(&self) -> Result<Vec<EventRule>, RepositoryError>;
}

/// Error enumeration for record store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Immutable in-memory copy of every table the engine reads. Barangay names match
/// case-insensitively with whitespace collapsed.
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    barangays: Vec<BarangayProfile>,
    census: Vec<CensusRecord>,
    members: Vec<HouseholdMember>,
    rules: Vec<EventRule>,
}

impl RecordSnapshot {
    pub fn new(
        barangays: Vec<BarangayProfile>,
        census: Vec<CensusRecord>,
        members: Vec<HouseholdMember>,
        rules: Vec<EventRule>,
    ) -> Self {
        Self {
            barangays,
            census,
            members,
            rules,
        }
    }

    pub fn barangays(&self) -> &[BarangayProfile] {
        &self.barangays
    }

    pub fn census(&self) -> &[CensusRecord] {
        &self.census
    }

    pub fn members(&self) -> &[HouseholdMember] {
        &self.members
    }

    pub fn rules(&self) -> &[EventRule] {
        &self.rules
    }
}

impl RecordStore for RecordSnapshot {
    fn fetch_barangay(&self, name: &str) -> Result<Option<BarangayProfile>, RepositoryError> {
        Ok(self
            .barangays
            .iter()
            .find(|profile| same_barangay(&profile.name, name))
            .cloned())
    }

    fn fetch_barangays(&self) -> Result<Vec<BarangayProfile>, RepositoryError> {
        Ok(self.barangays.clone())
    }

    fn fetch_census_records(&self, barangay: &str) -> Result<Vec<CensusRecord>, RepositoryError> {
        Ok(self
            .census
            .iter()
            .filter(|record| same_barangay(&record.barangay, barangay))
            .cloned()
            .collect())
    }

    fn fetch_household_members(
        &self,
        household_ids: &[HouseholdId],
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        if household_ids.is_empty() {
            return Ok(Vec::new());
        }

        let wanted: HashSet<HouseholdId> = household_ids.iter().copied().collect();
        Ok(self
            .members
            .iter()
            .filter(|member| {
                member
                    .household_id
                    .is_some_and(|household_id| wanted.contains(&household_id))
            })
            .cloned()
            .collect())
    }

    fn fetch_event_rules(&self) -> Result<Vec<EventRule>, RepositoryError> {
        Ok(self.rules.clone())
    }
}
