//! Text-to-speech for audio replies.
//!
//! * [`SpeechSynthesizer`] — async seam used by the orchestrator.
//! * [`ApiSynthesizer`] — OpenAI-compatible speech endpoint backend.
//! * [`resolve_voice`] — declared language → voice lookup.

pub mod speech;
pub mod voice;

pub use speech::ApiSynthesizer;
pub use voice::{resolve_voice, SelectedVoice};

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Language;

/// Errors raised while producing reply audio.
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("nothing to synthesize")]
    EmptyText,

    /// The voice table references a voice that is not available.
    #[error("no voice {requested} for language '{language}' ({available} voice(s) available)")]
    VoiceUnavailable {
        language: Language,
        requested: String,
        available: usize,
    },

    #[error("speech request failed: {0}")]
    Request(String),

    #[error("speech request timed out")]
    Timeout,

    #[error("speech service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("speech service returned no audio")]
    EmptyAudio,

    #[error("cannot write audio file: {0}")]
    Io(String),
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

/// Object-safe text-to-speech interface.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text` in `language` and return the path of a newly written
    /// audio file.
    async fn synthesize(&self, text: &str, language: Language) -> Result<PathBuf, TtsError>;
}
