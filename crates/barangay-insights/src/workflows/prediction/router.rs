use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::RecordStore;
use super::service::{PredictionService, PredictionServiceError};
use crate::workflows::weather::{resolve_weather, WeatherFeed};

/// Everything the prediction endpoints need: the service and the weather feed it reads.
pub struct PredictionContext<S, W> {
    pub service: PredictionService<S>,
    pub weather: W,
}

impl<S, W> PredictionContext<S, W> {
    pub fn new(service: PredictionService<S>, weather: W) -> Self {
        Self { service, weather }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PredictionQuery {
    #[serde(default)]
    barangay: Option<String>,
}

/// Router builder exposing single-barangay and all-barangay predictions.
pub fn prediction_router<S, W>(context: Arc<PredictionContext<S, W>>) -> Router
where
    S: RecordStore + 'static,
    W: WeatherFeed + 'static,
{
    Router::new()
        .route("/api/v1/predictions", get(evaluate_handler::<S, W>))
        .route("/api/v1/predictions/all", get(evaluate_all_handler::<S, W>))
        .with_state(context)
}

pub(crate) async fn evaluate_handler<S, W>(
    State(context): State<Arc<PredictionContext<S, W>>>,
    Query(query): Query<PredictionQuery>,
) -> Response
where
    S: RecordStore + 'static,
    W: WeatherFeed + 'static,
{
    let Some(barangay) = query
        .barangay
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    else {
        let payload = json!({ "error": "Missing barangay parameter" });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    let weather = resolve_weather(&context.weather).await;
    match context.service.evaluate(&barangay, &weather) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(PredictionServiceError::BarangayNotFound { barangay }) => {
            let payload = json!({
                "error": "Barangay not found",
                "barangay": barangay,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn evaluate_all_handler<S, W>(
    State(context): State<Arc<PredictionContext<S, W>>>,
) -> Response
where
    S: RecordStore + 'static,
    W: WeatherFeed + 'static,
{
    let weather = resolve_weather(&context.weather).await;
    match context.service.evaluate_all(&weather) {
        Ok(barangays) => {
            let payload = json!({
                "weather_source": weather.source,
                "barangays": barangays,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
