//! Core library for the `voice-weather` assistant.
//!
//! This crate defines:
//! - Interpretation of a spoken query into a city and a target moment
//! - Selection of the forecast entry closest to that moment
//! - Abstraction over the weather provider and the speech collaborators
//! - Configuration & credentials handling
//!
//! It is used by `voice-weather-cli`, but can also be reused by other front-ends.

pub mod assistant;
pub mod city;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod select;
pub mod speech;
pub mod time;

pub use assistant::{Assistant, Interpretation};
pub use config::Config;
pub use error::{ProviderError, QueryError};
pub use model::{ForecastEntry, ReportKind, Units, WeatherReport, WeatherRequest, WeatherSample};
pub use provider::{WeatherProvider, provider_from_config};
pub use speech::{InputError, SpeechInput, SpeechOutput};
pub use time::TimeExpression;
