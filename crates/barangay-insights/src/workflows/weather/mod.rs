//! Monthly rainfall/temperature series, the feed that supplies it, and the risk estimator.
//!
//! The live feed is consulted at most once per evaluation. Any failure (transport, timeout,
//! payload without a usable `rainfall` or `temperature` array) swaps in the fallback series as a
//! whole; live and fallback values are never mixed.

mod feed;
mod risk;

pub use feed::{HttpWeatherFeed, StaticWeatherFeed, WeatherFeed, WeatherFeedError};
pub use risk::{monthly_forecast, MonthlyRisk, RiskKind, WeatherRisk};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub const MONTHS_PER_YEAR: usize = 12;

pub const MONTH_LABELS: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const FALLBACK_RAINFALL_MM: [f64; MONTHS_PER_YEAR] = [
    200.0, 250.0, 300.0, 400.0, 450.0, 500.0, 550.0, 550.0, 350.0, 250.0, 200.0, 150.0,
];

const FALLBACK_TEMPERATURE_C: [f64; MONTHS_PER_YEAR] = [
    30.0, 31.0, 33.0, 34.0, 35.0, 36.0, 35.0, 34.0, 33.0, 32.0, 31.0, 30.0,
];

/// Twelve ordered monthly readings, January first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    rainfall: [f64; MONTHS_PER_YEAR],
    temperature: [f64; MONTHS_PER_YEAR],
}

impl MonthlySeries {
    pub fn new(rainfall: Vec<f64>, temperature: Vec<f64>) -> Result<Self, WeatherFeedError> {
        let rainfall = to_months("rainfall", rainfall)?;
        let temperature = to_months("temperature", temperature)?;
        Ok(Self {
            rainfall,
            temperature,
        })
    }

    /// Series used whenever the live feed cannot be used.
    pub fn fallback() -> Self {
        Self {
            rainfall: FALLBACK_RAINFALL_MM,
            temperature: FALLBACK_TEMPERATURE_C,
        }
    }

    /// Parse a feed payload shaped like `{"rainfall": [...], "temperature": [...]}`.
    pub fn from_payload(payload: &Value) -> Result<Self, WeatherFeedError> {
        let rainfall = payload
            .get("rainfall")
            .ok_or(WeatherFeedError::MissingRainfall)?;
        let temperature = payload
            .get("temperature")
            .ok_or(WeatherFeedError::MissingTemperature)?;

        Self::new(
            numbers("rainfall", rainfall)?,
            numbers("temperature", temperature)?,
        )
    }

    pub fn rainfall(&self) -> &[f64; MONTHS_PER_YEAR] {
        &self.rainfall
    }

    pub fn temperature(&self) -> &[f64; MONTHS_PER_YEAR] {
        &self.temperature
    }

    pub fn average_rainfall(&self) -> f64 {
        mean(&self.rainfall)
    }

    pub fn average_temperature(&self) -> f64 {
        mean(&self.temperature)
    }
}

fn mean(values: &[f64; MONTHS_PER_YEAR]) -> f64 {
    values.iter().sum::<f64>() / MONTHS_PER_YEAR as f64
}

fn to_months(
    field: &'static str,
    values: Vec<f64>,
) -> Result<[f64; MONTHS_PER_YEAR], WeatherFeedError> {
    let count = values.len();
    if values.iter().any(|value| !value.is_finite()) {
        return Err(WeatherFeedError::InvalidSeries {
            field,
            reason: "non-finite reading".to_string(),
        });
    }
    values
        .try_into()
        .map_err(|_| WeatherFeedError::InvalidSeries {
            field,
            reason: format!("expected {MONTHS_PER_YEAR} monthly values, got {count}"),
        })
}

fn numbers(field: &'static str, value: &Value) -> Result<Vec<f64>, WeatherFeedError> {
    let items = value.as_array().ok_or_else(|| WeatherFeedError::InvalidSeries {
        field,
        reason: "not an array".to_string(),
    })?;

    items
        .iter()
        .map(|item| {
            let parsed = match item {
                Value::Number(number) => number.as_f64(),
                Value::String(raw) => raw.trim().parse::<f64>().ok(),
                _ => None,
            };
            parsed.ok_or_else(|| WeatherFeedError::InvalidSeries {
                field,
                reason: format!("non-numeric reading {item}"),
            })
        })
        .collect()
}

/// Where the series used for an evaluation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    Live,
    Fallback,
}

impl WeatherSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Live => "Live weather feed",
            Self::Fallback => "Fallback monthly series",
        }
    }
}

/// Weather input for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub series: MonthlySeries,
    pub source: WeatherSource,
}

impl WeatherSnapshot {
    pub fn live(series: MonthlySeries) -> Self {
        Self {
            series,
            source: WeatherSource::Live,
        }
    }

    pub fn fallback() -> Self {
        Self {
            series: MonthlySeries::fallback(),
            source: WeatherSource::Fallback,
        }
    }

    pub fn risk(&self) -> WeatherRisk {
        WeatherRisk::estimate(&self.series)
    }
}

/// Fetch the series once; a failure of any kind resolves to the fallback snapshot.
pub async fn resolve_weather<F>(feed: &F) -> WeatherSnapshot
where
    F: WeatherFeed,
{
    match feed.fetch_monthly_series().await {
        Ok(series) => {
            debug!(
                avg_rainfall = series.average_rainfall(),
                avg_temp = series.average_temperature(),
                "using live weather series"
            );
            WeatherSnapshot::live(series)
        }
        Err(WeatherFeedError::Disabled) => {
            debug!("weather feed disabled; using fallback series");
            WeatherSnapshot::fallback()
        }
        Err(err) => {
            warn!(error = %err, "weather feed unavailable; using fallback series");
            WeatherSnapshot::fallback()
        }
    }
}
