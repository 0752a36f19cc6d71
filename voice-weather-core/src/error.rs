//! Error types surfaced by a single assistant interaction.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::speech::InputError;

/// Failure talking to the weather provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request to weather service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather service responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode weather service response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid forecast timestamp '{0}'")]
    Timestamp(String),
}

/// Every variant ends the current query; none is retried.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("no speech captured")]
    NoSpeech,

    #[error("no city detected in query")]
    NoCity,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no forecast entry near {0}")]
    NoForecastEntry(NaiveDateTime),
}

impl QueryError {
    /// Sentence spoken back to the user. Never includes provider detail.
    pub fn apology(&self) -> &'static str {
        match self {
            QueryError::NoSpeech => "Sorry, I did not catch that.",
            QueryError::NoCity => "Sorry, I could not detect a city name.",
            QueryError::Provider(_) => "Sorry, I could not reach the weather service.",
            QueryError::NoForecastEntry(_) => "Sorry, I could not find a suitable forecast time.",
        }
    }
}

impl From<InputError> for QueryError {
    fn from(_: InputError) -> Self {
        QueryError::NoSpeech
    }
}
