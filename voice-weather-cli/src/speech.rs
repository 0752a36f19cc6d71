//! Concrete speech collaborators for the terminal.

use std::{
    io::{self, BufRead, Write},
    process::Command,
};

use voice_weather_core::{InputError, SpeechInput, SpeechOutput};

/// An utterance that was already captured, e.g. given on the command line.
#[derive(Debug)]
pub struct FixedInput(Option<Result<String, InputError>>);

impl FixedInput {
    pub fn new(heard: Result<String, InputError>) -> Self {
        Self(Some(heard))
    }

    pub fn text(text: &str) -> Self {
        Self::new(Ok(text.to_lowercase()))
    }
}

impl SpeechInput for FixedInput {
    fn listen(&mut self) -> Result<String, InputError> {
        self.0.take().unwrap_or(Err(InputError::Closed))
    }
}

/// Reads one typed query per line from stdin.
#[derive(Debug, Default)]
pub struct ConsoleInput;

impl SpeechInput for ConsoleInput {
    fn listen(&mut self) -> Result<String, InputError> {
        eprint!("Ask about the weather (e.g. 'what's the weather in seoul tomorrow?'): ");
        io::stderr().flush().ok();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => Err(InputError::Closed),
            Ok(_) => non_empty(&line),
            Err(e) => Err(InputError::Transport(e.to_string())),
        }
    }
}

/// Runs an external speech-to-text command and takes its stdout as the query.
#[derive(Debug)]
pub struct CommandInput {
    program: String,
    args: Vec<String>,
}

impl CommandInput {
    /// `command` is split on whitespace; `device` is passed as `--device N`.
    pub fn new(command: &str, device: Option<u32>) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        let mut args: Vec<String> = parts.collect();

        if let Some(device) = device {
            args.push("--device".to_string());
            args.push(device.to_string());
        }

        Some(Self { program, args })
    }
}

impl SpeechInput for CommandInput {
    fn listen(&mut self) -> Result<String, InputError> {
        tracing::debug!(program = %self.program, args = ?self.args, "Running transcriber");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| InputError::Transport(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InputError::Transport(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout).map_err(|_| InputError::Unintelligible)?;
        non_empty(&text)
    }
}

fn non_empty(text: &str) -> Result<String, InputError> {
    let text = text.trim();
    if text.is_empty() {
        Err(InputError::NoSpeech)
    } else {
        Ok(text.to_lowercase())
    }
}

/// Prints the sentence and says it with `espeak` when available.
#[derive(Debug, Default)]
pub struct EspeakOutput;

impl SpeechOutput for EspeakOutput {
    fn speak(&self, sentence: &str) {
        println!("{sentence}");

        match Command::new("espeak").arg(sentence).status() {
            Ok(status) if !status.success() => {
                tracing::warn!(%status, "espeak did not finish successfully");
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("espeak not found; install it to hear answers (e.g. `sudo apt install espeak`)");
            }
            Err(e) => tracing::warn!(error = %e, "Failed to run espeak"),
        }
    }
}

/// Prints the sentence only.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl SpeechOutput for ConsoleOutput {
    fn speak(&self, sentence: &str) {
        println!("{sentence}");
    }
}
