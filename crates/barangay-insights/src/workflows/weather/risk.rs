use serde::Serialize;

use super::{MonthlySeries, MONTH_LABELS};

const DENGUE_RAINFALL_MM: f64 = 500.0;
const FLOOD_RAINFALL_MM: f64 = 550.0;
const HEAT_BASELINE_C: f64 = 30.0;
const HEAT_SPAN_C: f64 = 10.0;

/// Climate risk percentages derived from average rainfall and temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherRisk {
    pub avg_rainfall: f64,
    pub avg_temp: f64,
    pub dengue_risk: f64,
    pub flood_risk: f64,
    pub heat_risk: f64,
    pub drought_risk: f64,
}

impl WeatherRisk {
    pub fn estimate(series: &MonthlySeries) -> Self {
        Self::from_readings(series.average_rainfall(), series.average_temperature())
    }

    pub fn from_readings(rainfall_mm: f64, temperature_c: f64) -> Self {
        Self {
            avg_rainfall: rainfall_mm,
            avg_temp: temperature_c,
            dengue_risk: percent(rainfall_mm / DENGUE_RAINFALL_MM * 100.0),
            flood_risk: percent(rainfall_mm / FLOOD_RAINFALL_MM * 100.0),
            heat_risk: percent((temperature_c - HEAT_BASELINE_C) / HEAT_SPAN_C * 100.0),
            drought_risk: percent((1.0 - rainfall_mm / DENGUE_RAINFALL_MM) * 100.0),
        }
    }
}

// Both bounds apply: negative rainfall or temperatures above 40 C would otherwise escape.
fn percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    DengueFlood,
    Heat,
    Drought,
}

impl RiskKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DengueFlood => "Dengue/Flood",
            Self::Heat => "Heat",
            Self::Drought => "Drought",
        }
    }
}

/// One month of the forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRisk {
    pub month: &'static str,
    pub rainfall_mm: f64,
    pub temperature_c: f64,
    pub dengue_risk: f64,
    pub flood_risk: f64,
    pub heat_risk: f64,
    pub drought_risk: f64,
    pub main_risk: RiskKind,
    pub main_risk_label: &'static str,
}

/// Apply the risk formulas month by month. Ties resolve in Dengue/Flood, Heat, Drought order.
pub fn monthly_forecast(series: &MonthlySeries) -> Vec<MonthlyRisk> {
    MONTH_LABELS
        .into_iter()
        .zip(series.rainfall().iter().zip(series.temperature().iter()))
        .map(|(month, (&rainfall_mm, &temperature_c))| {
            let risk = WeatherRisk::from_readings(rainfall_mm, temperature_c);
            let main_risk = [
                (RiskKind::Heat, risk.heat_risk),
                (RiskKind::Drought, risk.drought_risk),
            ]
            .into_iter()
            .fold(
                (RiskKind::DengueFlood, risk.dengue_risk),
                |best, candidate| if candidate.1 > best.1 { candidate } else { best },
            )
            .0;

            MonthlyRisk {
                month,
                rainfall_mm,
                temperature_c,
                dengue_risk: risk.dengue_risk,
                flood_risk: risk.flood_risk,
                heat_risk: risk.heat_risk,
                drought_risk: risk.drought_risk,
                main_risk,
                main_risk_label: main_risk.label(),
            }
        })
        .collect()
}
