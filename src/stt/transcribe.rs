//! Transcription parameter types and result types.
//!
//! [`TranscribeParams`] carries the engine-wide settings for Whisper
//! inference; the spoken language is supplied per call.
//! [`TranscriptionResult`] is returned by [`WhisperEngine::transcribe_full`].
//!
//! [`WhisperEngine::transcribe_full`]: crate::stt::WhisperEngine::transcribe_full

// ---------------------------------------------------------------------------
// SamplingStrategy
// ---------------------------------------------------------------------------

/// Mirrors `whisper_rs::SamplingStrategy` but is owned and `Clone`.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingStrategy {
    /// Greedy (single-pass) decoding.
    Greedy {
        /// Number of candidate tokens evaluated per step.  1 is fastest.
        best_of: i32,
    },
    /// Beam-search decoding.
    BeamSearch {
        beam_size: i32,
        /// Beam-search patience factor (≥1.0 = standard beam search).
        patience: f32,
    },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        Self::Greedy { best_of: 1 }
    }
}

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// Engine-wide parameters for Whisper transcription.
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// Decoding strategy — Greedy is fastest, BeamSearch is more accurate.
    pub strategy: SamplingStrategy,

    /// Number of CPU threads handed to Whisper.  Defaults to
    /// [`optimal_threads()`], capped at 8.
    pub n_threads: i32,

    /// Suppress Whisper's progress output to stderr.
    pub suppress_progress: bool,

    /// Ask whisper.cpp for GPU inference when it was built with support.
    pub use_gpu: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            strategy: SamplingStrategy::default(),
            n_threads: optimal_threads(),
            suppress_progress: true,
            use_gpu: false,
        }
    }
}

/// Number of CPU threads to use for inference, capped at 8.
pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// The output of a successful transcription.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// Full concatenated transcript (trimmed).
    pub text: String,
    /// Individual time-aligned segments produced by Whisper.
    pub segments: Vec<Segment>,
    /// Wall-clock inference time in milliseconds.
    pub duration_ms: u128,
}

/// A single time-aligned text chunk produced by Whisper.
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}
