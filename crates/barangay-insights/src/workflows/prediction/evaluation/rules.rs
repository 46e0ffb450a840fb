use std::collections::HashMap;

use serde::Serialize;

use super::super::domain::{EventRule, IndicatorSet};

/// Keyword tokens recognized inside a rule condition, each tied to one indicator threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionToken {
    FloodProne,
    LowIncome,
    Waste,
    Disease,
    Youth,
    Rain,
    Heat,
    Drought,
}

impl ConditionToken {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::FloodProne,
            Self::LowIncome,
            Self::Waste,
            Self::Disease,
            Self::Youth,
            Self::Rain,
            Self::Heat,
            Self::Drought,
        ]
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::FloodProne => "flood_prone",
            Self::LowIncome => "low_income",
            Self::Waste => "waste",
            Self::Disease => "disease",
            Self::Youth => "youth",
            Self::Rain => "rain",
            Self::Heat => "heat",
            Self::Drought => "drought",
        }
    }

    pub fn holds(self, indicators: &IndicatorSet) -> bool {
        match self {
            Self::FloodProne => indicators.flood_prone,
            Self::LowIncome => indicators.low_income_rate > 30.0,
            Self::Waste => indicators.waste_problem_rate > 20.0,
            Self::Disease => indicators.health_issue_rate > 10.0,
            Self::Youth => indicators.youth_enrollment_rate > 20.0,
            Self::Rain => indicators.avg_rainfall > 450.0,
            Self::Heat => indicators.avg_temp > 34.0,
            Self::Drought => indicators.avg_rainfall < 200.0,
        }
    }

    fn describe(self, indicators: &IndicatorSet) -> String {
        match self {
            Self::FloodProne => "barangay is flood prone".to_string(),
            Self::LowIncome => {
                format!("low income rate {:.2}% above 30%", indicators.low_income_rate)
            }
            Self::Waste => format!(
                "waste problem rate {:.2}% above 20%",
                indicators.waste_problem_rate
            ),
            Self::Disease => format!(
                "health issue rate {:.2}% above 10%",
                indicators.health_issue_rate
            ),
            Self::Youth => format!(
                "youth enrollment rate {:.2}% above 20%",
                indicators.youth_enrollment_rate
            ),
            Self::Rain => {
                format!("average rainfall {:.1} mm above 450 mm", indicators.avg_rainfall)
            }
            Self::Heat => format!("average temperature {:.1} C above 34 C", indicators.avg_temp),
            Self::Drought => {
                format!("average rainfall {:.1} mm below 200 mm", indicators.avg_rainfall)
            }
        }
    }
}

/// Tokens mentioned in a condition, in table order. Matching is plain substring search on
/// the lower-cased text, so `"drain"` mentions `rain`.
pub fn condition_tokens(condition: &str) -> Vec<ConditionToken> {
    let condition = condition.to_lowercase();
    ConditionToken::ordered()
        .into_iter()
        .filter(|token| condition.contains(token.keyword()))
        .collect()
}

/// One matched token's contribution to an event, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub token: ConditionToken,
    pub score: f64,
    pub notes: String,
}

/// Running total for one event name across every rule row that defines it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTally {
    pub event: String,
    pub raw_score: f64,
    pub components: Vec<ScoreComponent>,
}

impl EventTally {
    /// Distinct matched keywords in first-match order.
    pub fn factors(&self) -> Vec<&'static str> {
        let mut factors: Vec<&'static str> = Vec::new();
        for component in &self.components {
            let keyword = component.token.keyword();
            if !factors.contains(&keyword) {
                factors.push(keyword);
            }
        }
        factors
    }
}

/// Totals in first-encounter order plus the event -> description lookup.
#[derive(Debug, Default)]
pub(crate) struct RuleTallies {
    pub(crate) tallies: Vec<EventTally>,
    pub(crate) descriptions: HashMap<String, String>,
}

impl RuleTallies {
    pub(crate) fn description(&self, event: &str) -> String {
        self.descriptions.get(event).cloned().unwrap_or_default()
    }

    pub(crate) fn max_score(&self) -> f64 {
        self.tallies
            .iter()
            .map(|tally| tally.raw_score)
            .fold(0.0, f64::max)
    }
}

/// Score every rule against the indicators. Each matched token adds the rule's full score,
/// so a condition naming two satisfied tokens contributes twice.
pub(crate) fn tally_rules(rules: &[EventRule], indicators: &IndicatorSet) -> RuleTallies {
    let mut result = RuleTallies::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for rule in rules {
        let slot = *index.entry(rule.event_name.clone()).or_insert_with(|| {
            result.tallies.push(EventTally {
                event: rule.event_name.clone(),
                raw_score: 0.0,
                components: Vec::new(),
            });
            result.tallies.len() - 1
        });

        result.descriptions.insert(
            rule.event_name.clone(),
            rule.description.clone().unwrap_or_default(),
        );

        let tally = &mut result.tallies[slot];
        for token in condition_tokens(&rule.rule_condition) {
            if token.holds(indicators) {
                tally.raw_score += rule.score;
                tally.components.push(ScoreComponent {
                    token,
                    score: rule.score,
                    notes: token.describe(indicators),
                });
            }
        }
    }

    result
}
