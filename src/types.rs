//! Small value types shared by the form, the orchestrator and the
//! collaborators: the target [`Language`] and the desired [`ResponseMode`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Target language of a submission.
///
/// Drives voice selection for speech synthesis and the language hint handed
/// to Whisper when an audio attachment is transcribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Kiswahili.
    Sw,
    /// French.
    Fr,
}

impl Language {
    /// Every language offered by the form, in dropdown order.
    pub const ALL: [Language; 3] = [Language::En, Language::Sw, Language::Fr];

    /// ISO-639-1 code (`"en"`, `"sw"`, `"fr"`).
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Sw => "sw",
            Language::Fr => "fr",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string is not one of the supported codes.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unknown value: {0:?}")]
pub struct ParseChoiceError(pub String);

impl FromStr for Language {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "sw" => Ok(Language::Sw),
            "fr" => Ok(Language::Fr),
            _ => Err(ParseChoiceError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ResponseMode
// ---------------------------------------------------------------------------

/// How the reply should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Reply text only.
    #[default]
    Text,
    /// Reply text plus a synthesized audio file.
    Audio,
}

impl ResponseMode {
    pub const ALL: [ResponseMode; 2] = [ResponseMode::Text, ResponseMode::Audio];

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseMode::Text => "text",
            ResponseMode::Audio => "audio",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ResponseMode::Text),
            "audio" => Ok(ResponseMode::Audio),
            _ => Err(ParseChoiceError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
