use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use super::domain::{
    CensusRecord, HouseholdId, HouseholdIndicators, HouseholdMember, IncomeBracket,
};

const POOR_DISPOSAL_METHODS: [&str; 5] = ["burning", "burying", "dumping", "none", "open burning"];
const LOW_INCOME_CEILING: f64 = 10_000.0;
const YOUTH_AGES: RangeInclusive<u32> = 5..=24;

/// Derive socioeconomic, health and youth rates for one barangay.
///
/// Members are grouped by household once. Only members whose household appears in `census`
/// contribute to household sizes. The three household rates share one denominator: residents
/// of households with at least one member carrying an income label. Waste and health
/// numerators count every surveyed household, so those two rates are capped at 100.
pub fn aggregate_households(
    census: &[CensusRecord],
    members: &[HouseholdMember],
) -> HouseholdIndicators {
    let households = group_members(census, members);

    let mut counted_population = 0usize;
    let mut counted_households = 0usize;
    let mut low_income_population = 0usize;
    let mut waste_population = 0usize;
    let mut health_population = 0usize;
    let mut seen = HashSet::new();

    for record in census {
        if !seen.insert(record.id) {
            continue;
        }

        let household = households.get(&record.id).map(Vec::as_slice).unwrap_or(&[]);
        let size = household.len();

        if has_waste_problem(record) {
            waste_population += size;
        }
        if record.reports_disease() {
            health_population += size;
        }

        if let Some(average_income) = average_income(household) {
            counted_population += size;
            counted_households += 1;
            if average_income <= LOW_INCOME_CEILING {
                low_income_population += size;
            }
        }
    }

    let (youth, enrolled_youth) = members
        .iter()
        .filter(|member| YOUTH_AGES.contains(&member.age_or_zero()))
        .fold((0usize, 0usize), |(youth, enrolled), member| {
            (youth + 1, enrolled + usize::from(member.is_enrolled()))
        });

    HouseholdIndicators {
        low_income_rate: rate(low_income_population, counted_population),
        waste_problem_rate: rate(waste_population, counted_population).min(100.0),
        health_issue_rate: rate(health_population, counted_population).min(100.0),
        youth_enrollment_rate: rate(enrolled_youth, youth),
        counted_population,
        counted_households,
    }
}

fn group_members<'a>(
    census: &[CensusRecord],
    members: &'a [HouseholdMember],
) -> HashMap<HouseholdId, Vec<&'a HouseholdMember>> {
    let known: HashSet<HouseholdId> = census.iter().map(|record| record.id).collect();
    let mut households: HashMap<HouseholdId, Vec<&HouseholdMember>> = HashMap::new();

    for member in members {
        if let Some(household_id) = member.household_id.filter(|id| known.contains(id)) {
            households.entry(household_id).or_default().push(member);
        }
    }

    households
}

/// Mean representative income over members with a label; `None` when nobody has one.
/// Unrecognized labels count as 0.
pub(crate) fn average_income(household: &[&HouseholdMember]) -> Option<f64> {
    let incomes: Vec<f64> = household
        .iter()
        .filter_map(|member| member.income_label())
        .map(|label| {
            IncomeBracket::from_label(label).map_or(0.0, IncomeBracket::representative_value)
        })
        .collect();

    if incomes.is_empty() {
        return None;
    }

    Some(incomes.iter().sum::<f64>() / incomes.len().max(1) as f64)
}

fn has_waste_problem(record: &CensusRecord) -> bool {
    let disposal = record
        .garbage_disposal
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let segregates = record
        .segregate
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    POOR_DISPOSAL_METHODS.contains(&disposal.as_str()) || segregates == "no"
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
