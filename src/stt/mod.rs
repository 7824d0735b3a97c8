//! Speech-to-text for uploaded recordings.
//!
//! ```text
//! .wav bytes ─▶ audio::decode_wav ─▶ to_whisper_input (16 kHz mono f32)
//!                                            │
//!                                            ▼
//!                          SttEngine::transcribe(audio, language)
//! ```
//!
//! [`WhisperEngine`] runs a local GGML model through `whisper-rs`.  Loading
//! is done once at startup; the engine is then shared behind
//! `Arc<dyn SttEngine>`.

pub mod engine;
pub mod transcribe;

pub use engine::{SttEngine, SttError, UnavailableStt, WhisperEngine};
pub use transcribe::{SamplingStrategy, Segment, TranscribeParams, TranscriptionResult};

#[cfg(test)]
pub use engine::MockSttEngine;
