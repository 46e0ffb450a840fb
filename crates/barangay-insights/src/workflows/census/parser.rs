use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::normalizer::{normalize_name, parse_amount};
use crate::workflows::prediction::domain::{
    BarangayProfile, CensusRecord, EventRule, HouseholdId, HouseholdMember,
};

/// Row-level problem that makes a table unusable.
#[derive(Debug)]
pub(crate) struct InvalidRow {
    pub(crate) line: u64,
    pub(crate) reason: String,
}

pub(crate) enum ParseError {
    Csv(csv::Error),
    Row(InvalidRow),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

fn rows<R: Read, T: for<'de> Deserialize<'de>>(
    reader: R,
) -> impl Iterator<Item = (u64, Result<T, csv::Error>)> {
    let csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    // Header is line 1.
    csv_reader
        .into_deserialize::<T>()
        .enumerate()
        .map(|(index, row)| (index as u64 + 2, row))
}

pub(crate) fn parse_barangays<R: Read>(reader: R) -> Result<Vec<BarangayProfile>, ParseError> {
    let mut profiles = Vec::new();
    for (line, row) in rows::<R, BarangayRow>(reader) {
        let row = row?;
        let name = normalize_name(&row.barangay_name);
        if name.is_empty() {
            return Err(ParseError::Row(InvalidRow {
                line,
                reason: "barangay_name is empty".to_string(),
            }));
        }

        profiles.push(BarangayProfile {
            name,
            total_population: whole_number(row.total_population.as_deref()),
            total_households: whole_number(row.total_households.as_deref()),
            annual_budget: row
                .annual_budget
                .as_deref()
                .and_then(parse_amount)
                .unwrap_or(0.0),
            flood_prone: row
                .flood_prone
                .as_deref()
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("yes")),
        });
    }
    Ok(profiles)
}

pub(crate) fn parse_census<R: Read>(reader: R) -> Result<Vec<CensusRecord>, ParseError> {
    let mut records = Vec::new();
    for (line, row) in rows::<R, CensusRow>(reader) {
        let row = row?;
        let id = household_id(Some(row.id.as_str())).ok_or_else(|| {
            ParseError::Row(InvalidRow {
                line,
                reason: format!("id '{}' is not a household number", row.id),
            })
        })?;

        records.push(CensusRecord {
            id,
            barangay: row.barangay.as_deref().map(normalize_name).unwrap_or_default(),
            garbage_disposal: row.garbage_disposal,
            segregate: row.segregate,
            disease_1: row.disease_1,
            disease_2: row.disease_2,
            disease_3: row.disease_3,
        });
    }
    Ok(records)
}

pub(crate) fn parse_members<R: Read>(reader: R) -> Result<Vec<HouseholdMember>, ParseError> {
    let mut members = Vec::new();
    for (_, row) in rows::<R, MemberRow>(reader) {
        let row = row?;
        members.push(HouseholdMember {
            household_id: household_id(row.household_id.as_deref()),
            age: row
                .age
                .as_deref()
                .and_then(parse_amount)
                .filter(|age| *age >= 0.0)
                .map(|age| age as u32),
            monthly_income: row.monthly_income,
            currently_enrolled: row.currently_enrolled,
            sex: row.sex,
            employment_status: row.employment_status,
        });
    }
    Ok(members)
}

pub(crate) fn parse_rules<R: Read>(reader: R) -> Result<Vec<EventRule>, ParseError> {
    let mut rules = Vec::new();
    for (line, row) in rows::<R, RuleRow>(reader) {
        let row = row?;
        let event_name = normalize_name(&row.event_name);
        if event_name.is_empty() {
            return Err(ParseError::Row(InvalidRow {
                line,
                reason: "event_name is empty".to_string(),
            }));
        }

        rules.push(EventRule {
            event_name,
            rule_condition: row.rule_condition.unwrap_or_default(),
            score: row.score.as_deref().and_then(parse_amount).unwrap_or(0.0),
            description: row.description,
        });
    }
    Ok(rules)
}

fn whole_number(value: Option<&str>) -> u64 {
    value
        .and_then(parse_amount)
        .filter(|amount| *amount >= 0.0)
        .map(|amount| amount as u64)
        .unwrap_or(0)
}

fn household_id(value: Option<&str>) -> Option<HouseholdId> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|id| *id > 0)
        .map(HouseholdId)
}

#[derive(Debug, Deserialize)]
struct BarangayRow {
    #[serde(alias = "name")]
    barangay_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    total_population: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    total_households: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    annual_budget: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    flood_prone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CensusRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    barangay: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    garbage_disposal: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    segregate: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    disease_1: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    disease_2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    disease_3: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemberRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    household_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    age: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    monthly_income: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    currently_enrolled: Option<String>,
    #[serde(default, alias = "gender", deserialize_with = "empty_string_as_none")]
    sex: Option<String>,
    #[serde(
        default,
        alias = "status_work_business",
        deserialize_with = "empty_string_as_none"
    )]
    employment_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RuleRow {
    event_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rule_condition: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
