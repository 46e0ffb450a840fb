use crate::infra::build_context;
use barangay_insights::config::{AppConfig, WeatherConfig};
use barangay_insights::error::AppError;
use barangay_insights::workflows::prediction::{BarangayAssessment, BarangayOutcome};
use barangay_insights::workflows::weather::{resolve_weather, WeatherSource};
use clap::Args;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Barangay to evaluate
    #[arg(long, conflicts_with = "all", required_unless_present = "all")]
    pub(crate) barangay: Option<String>,
    /// Evaluate every barangay in the snapshot
    #[arg(long)]
    pub(crate) all: bool,
    /// Directory holding the census CSV tables
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Skip the weather feed and use the fallback monthly series
    #[arg(long)]
    pub(crate) offline: bool,
    /// Print the JSON payload instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(dir) = args.data_dir {
        config.data.dir = dir;
    }
    if args.offline {
        config.weather = WeatherConfig::offline();
    }

    let context = build_context(&config)?;
    let weather = resolve_weather(&context.weather).await;

    let output = match args.barangay {
        Some(barangay) => {
            let assessment = context.service.evaluate(&barangay, &weather)?;
            if args.json {
                to_json(&assessment)
            } else {
                render_assessment(&assessment)
            }
        }
        None => {
            let outcomes = context.service.evaluate_all(&weather)?;
            if args.json {
                to_json(&json!({
                    "weather_source": weather.source,
                    "barangays": outcomes,
                }))
            } else {
                render_all(weather.source, &outcomes)
            }
        }
    };

    println!("{output}");
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("{{\"error\": \"{err}\"}}"))
}

pub(crate) fn render_assessment(assessment: &BarangayAssessment) -> String {
    let mut content = String::new();
    let summary = &assessment.summary;

    writeln!(&mut content, "Predictive analytics: {}", assessment.barangay)
        .expect("write headline");
    writeln!(
        &mut content,
        "Weather source: {}",
        assessment.weather_source.label()
    )
    .expect("write weather source");
    writeln!(
        &mut content,
        "Population {} in {} households; annual budget ₱{:.2}; flood prone: {}",
        summary.total_population,
        summary.total_households,
        summary.annual_budget,
        if summary.flood_prone { "yes" } else { "no" }
    )
    .expect("write profile");

    content.push_str("\nIndicators\n");
    for (label, rate) in [
        ("Low income rate:      ", summary.low_income_rate),
        ("Waste problem rate:   ", summary.waste_problem_rate),
        ("Health issue rate:    ", summary.health_issue_rate),
        ("Youth enrollment rate:", summary.youth_enrollment_rate),
    ] {
        writeln!(&mut content, "  {label} {rate:>6.2}%").expect("write indicator");
    }
    writeln!(
        &mut content,
        "  Weather: {:.1} mm avg rainfall, {:.1} C avg temperature",
        summary.avg_rainfall_mm, summary.avg_temperature_c
    )
    .expect("write weather averages");
    writeln!(
        &mut content,
        "  Risks: dengue {:.1}, flood {:.1}, heat {:.1}, drought {:.1}",
        summary.dengue_risk, summary.flood_risk, summary.heat_risk, summary.drought_risk
    )
    .expect("write risks");

    if assessment.predictions.is_empty() {
        content.push_str("\nRecommended events: none\n");
    } else {
        content.push_str("\nRecommended events\n");
        for (rank, prediction) in assessment.predictions.iter().enumerate() {
            writeln!(
                &mut content,
                "  {}. {} (score {:.2}, raw {:.1}) budget ≈ ₱{:.0} [{}]",
                rank + 1,
                prediction.event,
                prediction.normalized_score,
                prediction.raw_score,
                prediction.approx_budget,
                prediction.factors.join(", ")
            )
            .expect("write prediction");
            if !prediction.description.is_empty() {
                writeln!(&mut content, "     {}", prediction.description)
                    .expect("write description");
            }
        }
    }

    content.push_str("\nMonthly risk outlook\n");
    for month in &assessment.monthly_risk {
        writeln!(
            &mut content,
            "  {}: {:>6.1} mm {:>5.1} C  main risk {}",
            month.month, month.rainfall_mm, month.temperature_c, month.main_risk_label
        )
        .expect("write month");
    }

    content
}

pub(crate) fn render_all(
    source: WeatherSource,
    outcomes: &BTreeMap<String, BarangayOutcome>,
) -> String {
    let mut content = String::new();
    writeln!(&mut content, "Barangay predictions ({})", source.label()).expect("write headline");

    for (name, outcome) in outcomes {
        match outcome {
            BarangayOutcome::Evaluated(assessment) => {
                let top = assessment
                    .predictions
                    .first()
                    .map(|prediction| {
                        format!(
                            "{} ({:.2})",
                            prediction.event, prediction.normalized_score
                        )
                    })
                    .unwrap_or_else(|| "no recommended events".to_string());
                writeln!(
                    &mut content,
                    "  {name}: {} recommended; top: {top}",
                    assessment.predictions.len()
                )
                .expect("write barangay line");
            }
            BarangayOutcome::Failed { error } => {
                writeln!(&mut content, "  {name}: evaluation failed ({error})")
                    .expect("write failure line");
            }
        }
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use barangay_insights::workflows::prediction::domain::{BarangayProfile, EventRule};
    use barangay_insights::workflows::prediction::{PredictionService, RecordSnapshot};
    use barangay_insights::workflows::weather::WeatherSnapshot;
    use std::sync::Arc;

    fn service() -> PredictionService<RecordSnapshot> {
        let snapshot = RecordSnapshot::new(
            vec![BarangayProfile {
                name: "San Roque".to_string(),
                total_population: 4_820,
                total_households: 1_105,
                annual_budget: 2_400_000.0,
                flood_prone: true,
            }],
            Vec::new(),
            Vec::new(),
            vec![EventRule {
                event_name: "Relief Drive".to_string(),
                rule_condition: "flood_prone".to_string(),
                score: 40.0,
                description: Some("Pre-position relief goods".to_string()),
            }],
        );
        PredictionService::new(Arc::new(snapshot))
    }

    #[test]
    fn text_report_lists_ranked_events_and_months() {
        let assessment = service()
            .evaluate("San Roque", &WeatherSnapshot::fallback())
            .expect("assessment");

        let report = render_assessment(&assessment);
        assert!(report.contains("Predictive analytics: San Roque"));
        assert!(report.contains("Weather source: Fallback monthly series"));
        assert!(report.contains("1. Relief Drive (score 100.00, raw 40.0)"));
        assert!(report.contains("Pre-position relief goods"));
        assert!(report.contains("Dec:"));
    }

    #[test]
    fn text_report_aligns_indicator_block() {
        let assessment = service()
            .evaluate("San Roque", &WeatherSnapshot::fallback())
            .expect("assessment");

        let report = render_assessment(&assessment);
        let indicators: Vec<&str> = report
            .lines()
            .skip_while(|line| *line != "Indicators")
            .skip(1)
            .take(4)
            .collect();
        assert_eq!(
            indicators,
            vec![
                "  Low income rate:         0.00%",
                "  Waste problem rate:      0.00%",
                "  Health issue rate:       0.00%",
                "  Youth enrollment rate:   0.00%",
            ]
        );
        assert!(report.contains("Weather: 345.8 mm avg rainfall, 32.8 C avg temperature"));
    }

    #[test]
    fn summary_report_marks_failures() {
        let service = service();
        let weather = WeatherSnapshot::fallback();
        let mut outcomes = service.evaluate_all(&weather).expect("outcomes");
        outcomes.insert(
            "Lambac".to_string(),
            BarangayOutcome::Failed {
                error: "record store unavailable: timeout".to_string(),
            },
        );

        let report = render_all(weather.source, &outcomes);
        assert!(report.contains("San Roque: 1 recommended; top: Relief Drive (100.00)"));
        assert!(report.contains("Lambac: evaluation failed (record store unavailable: timeout)"));
    }
}
