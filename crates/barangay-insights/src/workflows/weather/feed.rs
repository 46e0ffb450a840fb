use std::future::Future;

use serde_json::Value;

use super::MonthlySeries;
use crate::config::WeatherConfig;

/// Source of the monthly series. Implementations make a single attempt per call.
pub trait WeatherFeed: Send + Sync {
    fn fetch_monthly_series(
        &self,
    ) -> impl Future<Output = Result<MonthlySeries, WeatherFeedError>> + Send;
}

/// Reasons a feed could not produce a usable series. All of them trigger the fallback.
#[derive(Debug, thiserror::Error)]
pub enum WeatherFeedError {
    #[error("weather feed disabled")]
    Disabled,
    #[error("weather feed request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather feed unavailable: {0}")]
    Unavailable(String),
    #[error("weather payload has no rainfall series")]
    MissingRainfall,
    #[error("weather payload has no temperature series")]
    MissingTemperature,
    #[error("invalid {field} series: {reason}")]
    InvalidSeries { field: &'static str, reason: String },
}

/// JSON-over-HTTP feed with a bounded per-request timeout and no retries.
#[derive(Debug, Clone)]
pub struct HttpWeatherFeed {
    client: reqwest::Client,
    url: Option<String>,
}

impl HttpWeatherFeed {
    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherFeedError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("barangay-insights/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl WeatherFeed for HttpWeatherFeed {
    async fn fetch_monthly_series(&self) -> Result<MonthlySeries, WeatherFeedError> {
        let url = self.url.as_deref().ok_or(WeatherFeedError::Disabled)?;

        let payload = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        MonthlySeries::from_payload(&payload)
    }
}

/// Feed answering from a fixed payload; used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticWeatherFeed {
    payload: Option<Value>,
}

impl StaticWeatherFeed {
    pub fn payload(payload: Value) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    pub fn unavailable() -> Self {
        Self { payload: None }
    }
}

impl WeatherFeed for StaticWeatherFeed {
    async fn fetch_monthly_series(&self) -> Result<MonthlySeries, WeatherFeedError> {
        match &self.payload {
            Some(payload) => MonthlySeries::from_payload(payload),
            None => Err(WeatherFeedError::Unavailable(
                "no weather payload configured".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::weather::{resolve_weather, WeatherSource};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::time::Duration;

    async fn serve_payload(payload: Value) -> String {
        let app = Router::new().route(
            "/weather",
            get(move || {
                let payload = payload.clone();
                async move { Json(payload) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server runs");
        });
        format!("http://{addr}/weather")
    }

    fn feed_for(url: &str) -> HttpWeatherFeed {
        HttpWeatherFeed::from_config(&WeatherConfig::new(url, Duration::from_secs(2)))
            .expect("client builds")
    }

    #[tokio::test]
    async fn http_feed_parses_live_series() {
        let url = serve_payload(json!({
            "rainfall": vec![460; 12],
            "temperature": vec![35; 12],
        }))
        .await;

        let series = feed_for(&url)
            .fetch_monthly_series()
            .await
            .expect("live series");
        assert_eq!(series.average_rainfall(), 460.0);
        assert_eq!(series.average_temperature(), 35.0);
    }

    #[tokio::test]
    async fn http_feed_empty_object_resolves_to_fallback() {
        let url = serve_payload(json!({})).await;
        let feed = feed_for(&url);

        match feed.fetch_monthly_series().await {
            Err(WeatherFeedError::MissingRainfall) => {}
            other => panic!("expected missing rainfall, got {other:?}"),
        }

        let snapshot = resolve_weather(&feed).await;
        assert_eq!(snapshot.source, WeatherSource::Fallback);
        assert_eq!(
            (snapshot.series.average_rainfall() * 10.0).round() / 10.0,
            345.8
        );
    }

    #[tokio::test]
    async fn http_feed_connection_failure_is_soft() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let feed = feed_for(&format!("http://{addr}/weather"));
        let snapshot = resolve_weather(&feed).await;
        assert_eq!(snapshot.source, WeatherSource::Fallback);
    }

    #[tokio::test]
    async fn disabled_feed_never_issues_requests() {
        let feed = HttpWeatherFeed::from_config(&WeatherConfig::offline()).expect("client builds");
        assert!(feed.url().is_none());
        assert!(matches!(
            feed.fetch_monthly_series().await,
            Err(WeatherFeedError::Disabled)
        ));
    }
}
