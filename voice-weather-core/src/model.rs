use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Unit system forwarded to the weather provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial]
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What gets rendered: both provider shapes are projected onto this.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    pub temperature: f64,
    pub humidity: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub sample: WeatherSample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Current,
    Forecast,
}

#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub city: String,
    pub kind: ReportKind,
}

impl WeatherRequest {
    pub fn current(city: impl Into<String>) -> Self {
        Self { city: city.into(), kind: ReportKind::Current }
    }

    pub fn forecast(city: impl Into<String>) -> Self {
        Self { city: city.into(), kind: ReportKind::Forecast }
    }
}

/// Data returned by a provider, fetched fresh for every query.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReport {
    Current(WeatherSample),
    Forecast(Vec<ForecastEntry>),
}
