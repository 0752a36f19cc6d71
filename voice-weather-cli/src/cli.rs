use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Password, Select, Text};
use voice_weather_core::{
    Assistant, Config, InputError, QueryError, SpeechInput, SpeechOutput, Units,
    city::is_exit_command,
    provider_from_config,
};

use crate::speech::{CommandInput, ConsoleInput, ConsoleOutput, EspeakOutput, FixedInput};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "voice-weather", version, about = "Voice weather assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key, location and language preferences.
    Configure,

    /// Answer a single weather question.
    Ask {
        /// The question, e.g. "what's the weather in seoul tomorrow morning".
        /// Read from the transcriber or stdin when absent.
        text: Vec<String>,

        /// Print the answer without speaking it.
        #[arg(long)]
        silent: bool,
    },

    /// Keep answering questions until "quit" or "exit".
    Listen {
        /// Print answers without speaking them.
        #[arg(long)]
        silent: bool,
    },

    /// Show how a question is understood, without fetching weather.
    Parse {
        text: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Ask { text, silent } => {
                let config = Config::load()?;
                let assistant = Assistant::new(provider_from_config(&config)?);
                let mut input = speech_input(&config, &text);

                assistant
                    .respond(input.as_mut(), speech_output(silent).as_ref(), now())
                    .await?;
                Ok(())
            }
            Command::Listen { silent } => {
                let config = Config::load()?;
                let assistant = Assistant::new(provider_from_config(&config)?);
                listen(&assistant, speech_input(&config, &[]).as_mut(), speech_output(silent).as_ref())
                    .await
                    .context("Speech input failed")?;
                Ok(())
            }
            Command::Parse { text } => {
                let query = Assistant::interpret(&text.join(" "), now())?;
                println!("City:   {}", query.city);
                println!("Target: {}", query.time.instant());
                println!("Source: {}", if query.is_future { "forecast" } else { "current weather" });
                Ok(())
            }
        }
    }
}

/// Answers questions until an exit word or the end of input. A broken input
/// source (e.g. a transcriber that cannot run) ends the loop with its error.
async fn listen(
    assistant: &Assistant,
    input: &mut dyn SpeechInput,
    output: &dyn SpeechOutput,
) -> Result<(), InputError> {
    loop {
        let heard = input.listen();

        match &heard {
            Err(InputError::Closed) => return Ok(()),
            Err(e @ InputError::Transport(_)) => {
                output.speak(QueryError::from(e.clone()).apology());
                return Err(e.clone());
            }
            Ok(text) if is_exit_command(text) => {
                output.speak("Goodbye.");
                return Ok(());
            }
            _ => {}
        }

        // Failures are already spoken as apologies; move on to the next question.
        if let Err(e) = assistant.respond(&mut FixedInput::new(heard), output, now()).await {
            tracing::info!(error = %e, "Query failed");
        }
    }
}

fn speech_input(config: &Config, text: &[String]) -> Box<dyn SpeechInput> {
    if !text.is_empty() {
        return Box::new(FixedInput::text(&text.join(" ")));
    }

    match config
        .transcriber
        .as_deref()
        .and_then(|cmd| CommandInput::new(cmd, config.input_device))
    {
        Some(transcriber) => Box::new(transcriber),
        None => Box::new(ConsoleInput),
    }
}

fn speech_output(silent: bool) -> Box<dyn SpeechOutput> {
    if silent { Box::new(ConsoleOutput) } else { Box::new(EspeakOutput) }
}

fn now() -> chrono::NaiveDateTime {
    Local::now().naive_local()
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeatherMap API key (blank keeps the current one):")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !key.trim().is_empty() {
        config.api_key = Some(key.trim().to_string());
    }

    let country = Text::new("Default country code (blank for none):")
        .with_default(config.default_country.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read country")?;
    config.default_country = optional(&country);

    let start = Units::all().iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    let language = Text::new("Response language:")
        .with_default(&config.language)
        .prompt()
        .context("Failed to read language")?;
    config.language = optional(&language).unwrap_or(config.language);

    let device = config.input_device.map(|d| d.to_string()).unwrap_or_default();
    let device = Text::new("Input device index (blank for default):")
        .with_default(&device)
        .prompt()
        .context("Failed to read input device")?;
    config.input_device = match optional(&device) {
        Some(d) => Some(d.parse().with_context(|| format!("Invalid device index '{d}'"))?),
        None => None,
    };

    let transcriber = Text::new("Speech-to-text command (blank to type questions):")
        .with_default(config.transcriber.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read transcriber command")?;
    config.transcriber = optional(&transcriber);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
