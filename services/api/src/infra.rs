use barangay_insights::config::AppConfig;
use barangay_insights::error::AppError;
use barangay_insights::workflows::census::CensusSnapshotImporter;
use barangay_insights::workflows::prediction::{
    PredictionContext, PredictionService, RecordSnapshot,
};
use barangay_insights::workflows::weather::HttpWeatherFeed;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type SnapshotContext = PredictionContext<RecordSnapshot, HttpWeatherFeed>;

/// Import the CSV snapshot and wire it to the configured weather feed.
pub(crate) fn build_context(config: &AppConfig) -> Result<SnapshotContext, AppError> {
    let snapshot = CensusSnapshotImporter::from_dir(&config.data.dir)?;
    let feed = HttpWeatherFeed::from_config(&config.weather)?;
    Ok(PredictionContext::new(
        PredictionService::new(Arc::new(snapshot)),
        feed,
    ))
}
