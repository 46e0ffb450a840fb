use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::prediction::repository::RecordSnapshot;
use crate::workflows::prediction::{prediction_router, PredictionContext, PredictionService};
use crate::workflows::weather::StaticWeatherFeed;

fn router_with(feed: StaticWeatherFeed) -> axum::Router {
    let context = PredictionContext::new(build_service(), feed);
    prediction_router::<RecordSnapshot, StaticWeatherFeed>(Arc::new(context))
}

fn rainy_payload() -> Value {
    json!({
        "rainfall": vec![500.0; 12],
        "temperature": vec![33.0; 12],
    })
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("route executes");
    let status = response.status();
    (status, read_json_body(response).await)
}

#[tokio::test]
async fn missing_barangay_parameter_is_bad_request() {
    let (status, payload) = get(
        router_with(StaticWeatherFeed::unavailable()),
        "/api/v1/predictions",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload, json!({ "error": "Missing barangay parameter" }));
}

#[tokio::test]
async fn blank_barangay_parameter_is_bad_request() {
    let (status, _) = get(
        router_with(StaticWeatherFeed::unavailable()),
        "/api/v1/predictions?barangay=%20%20",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_barangay_is_not_found() {
    let (status, payload) = get(
        router_with(StaticWeatherFeed::unavailable()),
        "/api/v1/predictions?barangay=Atlantis",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        payload,
        json!({ "error": "Barangay not found", "barangay": "Atlantis" })
    );
}

#[tokio::test]
async fn known_barangay_returns_predictions_with_live_weather() {
    let (status, payload) = get(
        router_with(StaticWeatherFeed::payload(rainy_payload())),
        "/api/v1/predictions?barangay=San%20Jose",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["barangay"], "San Jose");
    assert_eq!(payload["weather_source"], "live");
    assert_eq!(payload["summary"]["avg_rainfall_mm"], 500.0);
    assert_eq!(payload["predictions"][0]["event"], "Relief Drive");
    assert_eq!(payload["predictions"][0]["normalized_score"], 100.0);
    assert_eq!(
        payload["predictions"][0]["factors"],
        json!(["flood_prone", "rain"])
    );
}

#[tokio::test]
async fn unavailable_feed_falls_back_to_seasonal_series() {
    let (status, payload) = get(
        router_with(StaticWeatherFeed::unavailable()),
        "/api/v1/predictions?barangay=San%20Jose",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["weather_source"], "fallback");
    assert_eq!(payload["summary"]["avg_rainfall_mm"], 345.8);
}

#[tokio::test]
async fn all_route_lists_every_barangay() {
    let (status, payload) = get(
        router_with(StaticWeatherFeed::payload(rainy_payload())),
        "/api/v1/predictions/all",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["weather_source"], "live");
    let barangays = payload["barangays"].as_object().expect("barangay map");
    assert_eq!(barangays.len(), 2);
    assert_eq!(barangays["San Jose"]["status"], "evaluated");
    assert_eq!(barangays["Santa Cruz"]["predictions"], json!([]));
}

#[tokio::test]
async fn store_failure_is_internal_error() {
    let context = PredictionContext::new(
        PredictionService::new(Arc::new(UnavailableStore)),
        StaticWeatherFeed::unavailable(),
    );
    let router = prediction_router(Arc::new(context));

    let response = router
        .oneshot(
            Request::get("/api/v1/predictions?barangay=San%20Jose")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
