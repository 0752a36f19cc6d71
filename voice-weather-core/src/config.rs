use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::model::Units;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Top-level configuration stored on disk. Read once at startup.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_country = "KR"
/// units = "metric"
/// language = "en"
/// input_device = 0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: Option<String>,

    /// Country qualifier appended to every city query, e.g. "KR".
    pub default_country: Option<String>,

    pub units: Units,

    /// Response language tag forwarded to the provider.
    pub language: String,

    /// Microphone selector handed to the transcriber.
    pub input_device: Option<u32>,

    /// External speech-to-text command; its stdout is the query.
    pub transcriber: Option<String>,

    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_country: None,
            units: Units::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            input_device: None,
            transcriber: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Returns the API key, or an error pointing at `configure`.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeatherMap API key configured.\n\
                     Hint: run `voice-weather configure` and enter your API key."
                )
            })
    }

    /// The `q` value sent to the provider: the city, qualified by the default
    /// country when one is set.
    pub fn location_query(&self, city: &str) -> String {
        match self.default_country.as_deref().map(str::trim) {
            Some(country) if !country.is_empty() => format!("{city},{country}"),
            _ => city.to_string(),
        }
    }

    /// Load config from the platform location, or return defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "voice-weather", "voice-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
