use std::path::PathBuf;
use std::sync::Arc;

use barangay_insights::workflows::census::CensusSnapshotImporter;
use barangay_insights::workflows::prediction::{PredictionService, RecordSnapshot};
use barangay_insights::workflows::weather::{
    resolve_weather, StaticWeatherFeed, WeatherSnapshot, WeatherSource,
};
use serde_json::json;

fn sample_service() -> PredictionService<RecordSnapshot> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/sample");
    let snapshot = CensusSnapshotImporter::from_dir(dir).expect("sample data imports");
    PredictionService::new(Arc::new(snapshot))
}

#[test]
fn sample_barangay_ranks_events_with_fallback_weather() {
    let service = sample_service();
    let assessment = service
        .evaluate("San Roque", &WeatherSnapshot::fallback())
        .expect("assessment");

    assert_eq!(assessment.summary.low_income_rate, 63.64);
    assert_eq!(assessment.summary.waste_problem_rate, 63.64);
    assert_eq!(assessment.summary.health_issue_rate, 63.64);
    assert_eq!(assessment.summary.youth_enrollment_rate, 60.0);
    assert_eq!(assessment.summary.avg_rainfall_mm, 345.8);

    let ranked: Vec<(&str, f64, f64)> = assessment
        .predictions
        .iter()
        .map(|prediction| {
            (
                prediction.event.as_str(),
                prediction.normalized_score,
                prediction.approx_budget,
            )
        })
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Relief Drive", 100.0, 1_440_000.0),
            ("Livelihood Seminar", 75.0, 1_200_000.0),
            ("Clean-up Drive", 62.5, 1_080_000.0),
            ("Medical Mission", 50.0, 960_000.0),
            ("Dengue Awareness Campaign", 50.0, 960_000.0),
        ]
    );
}

#[tokio::test]
async fn live_rainy_series_adds_rain_factors() {
    let service = sample_service();
    let feed = StaticWeatherFeed::payload(json!({
        "rainfall": vec![520.0; 12],
        "temperature": vec![29.0; 12],
    }));

    let weather = resolve_weather(&feed).await;
    assert_eq!(weather.source, WeatherSource::Live);

    let assessment = service.evaluate("San Roque", &weather).expect("assessment");
    let relief = &assessment.predictions[0];
    assert_eq!(relief.event, "Relief Drive");
    assert_eq!(relief.raw_score, 80.0);
    assert_eq!(relief.factors, vec!["flood_prone", "rain"]);
}

#[tokio::test]
async fn malformed_payload_uses_fallback_series() {
    let service = sample_service();
    let weather = resolve_weather(&StaticWeatherFeed::payload(json!({ "rainfall": "n/a" }))).await;
    assert_eq!(weather.source, WeatherSource::Fallback);

    let assessment = service.evaluate("Lambac", &weather).expect("assessment");
    assert_eq!(assessment.summary.avg_rainfall_mm, 345.8);
    assert_eq!(assessment.summary.avg_temperature_c, 32.8);
}

#[test]
fn evaluate_all_covers_every_sample_barangay() {
    let service = sample_service();
    let outcomes = service
        .evaluate_all(&WeatherSnapshot::fallback())
        .expect("outcomes");

    let names: Vec<&str> = outcomes.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Bancal", "Lambac", "San Roque", "Santo Niño"]);

    let bancal = outcomes["Bancal"].assessment().expect("evaluated");
    assert!(bancal.predictions.is_empty());
    assert!(bancal.scores.iter().all(|score| score.raw_score == 0.0));

    for outcome in outcomes.values() {
        let assessment = outcome.assessment().expect("evaluated");
        let single = service
            .evaluate(&assessment.barangay, &WeatherSnapshot::fallback())
            .expect("single evaluation");
        assert_eq!(assessment, &single);
    }
}
