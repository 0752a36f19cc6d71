use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    Config,
    error::ProviderError,
    model::{ForecastEntry, ReportKind, WeatherReport, WeatherRequest, WeatherSample},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    config: Config,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: Config, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            config,
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, endpoint: &str, city: &str) -> Result<String, ProviderError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let q = self.config.location_query(city);

        tracing::info!(endpoint, q = %q, "Requesting weather data");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", q.as_str()),
                ("units", self.config.units.as_str()),
                ("lang", self.config.language.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwError>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| truncate_body(&body));

            tracing::warn!(endpoint, status = status.as_u16(), %message, "OpenWeather request failed");

            return Err(ProviderError::Status { status: status.as_u16(), message });
        }

        Ok(body)
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherSample, ProviderError> {
        let body = self.get("weather", city).await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        Ok(to_sample(parsed.main, &parsed.weather))
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, ProviderError> {
        let body = self.get("forecast", city).await?;
        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        tracing::debug!(entries = parsed.list.len(), "Parsed OpenWeather forecast");

        parsed
            .list
            .into_iter()
            .map(|entry| {
                // dt_txt is UTC while the target instant is local wall-clock time.
                // They are compared as naive values on purpose; answers for
                // "morning" in non-UTC zones land on the UTC slot.
                let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT)
                    .map_err(|_| ProviderError::Timestamp(entry.dt_txt.clone()))?;

                Ok(ForecastEntry {
                    timestamp,
                    sample: to_sample(entry.main, &entry.weather),
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwError {
    message: String,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, request: &WeatherRequest) -> Result<WeatherReport, ProviderError> {
        match request.kind {
            ReportKind::Current => self.fetch_current(&request.city).await.map(WeatherReport::Current),
            ReportKind::Forecast => {
                self.fetch_forecast(&request.city).await.map(WeatherReport::Forecast)
            }
        }
    }
}

fn to_sample(main: OwMain, weather: &[OwWeather]) -> WeatherSample {
    let description = weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "unknown conditions".to_string());

    WeatherSample {
        temperature: main.temp,
        humidity: main.humidity,
        description,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
