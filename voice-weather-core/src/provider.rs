use crate::{
    Config, WeatherReport, WeatherRequest, error::ProviderError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Source of weather data. One call per query, no caching.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, request: &WeatherRequest) -> Result<WeatherReport, ProviderError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = OpenWeatherProvider::new(
        api_key.to_owned(),
        config.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;

    Ok(Box::new(provider))
}
