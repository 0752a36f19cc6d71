//! Seams for the speech collaborators: something that hears a query and
//! something that says the answer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no speech detected")]
    NoSpeech,

    #[error("speech could not be understood")]
    Unintelligible,

    #[error("speech recognition failed: {0}")]
    Transport(String),

    /// The input source has nothing more to give.
    #[error("input closed")]
    Closed,
}

/// Produces one lower-cased utterance per call.
pub trait SpeechInput {
    fn listen(&mut self) -> Result<String, InputError>;
}

/// Says a finished sentence. Failures are the sink's business.
pub trait SpeechOutput {
    fn speak(&self, sentence: &str);
}
