use crate::cli::ServeArgs;
use crate::infra::{build_context, AppState};
use crate::routes::with_prediction_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use barangay_insights::config::{AppConfig, WeatherConfig};
use barangay_insights::error::AppError;
use barangay_insights::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dir) = args.data_dir.take() {
        config.data.dir = dir;
    }
    if let Some(url) = args.weather_url.take() {
        config.weather = WeatherConfig::new(url, config.weather.timeout);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let context = Arc::new(build_context(&config)?);
    info!(
        data_dir = %config.data.dir.display(),
        weather_url = context.weather.url().unwrap_or("disabled"),
        "prediction context loaded"
    );

    let app = with_prediction_routes(context)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "barangay insights service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
