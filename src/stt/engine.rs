//! Core STT engine trait and implementations.
//!
//! [`SttEngine`] is the interface the orchestrator uses.  It is object-safe
//! and `Send + Sync` so it can be held behind an `Arc<dyn SttEngine>`.
//!
//! [`WhisperEngine`] wraps a `whisper_rs::WhisperContext`.
//! [`UnavailableStt`] stands in when no model could be loaded at startup, so
//! the app still launches and audio attachments fail with a clear message.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, WhisperContext, WhisperContextParameters};

use crate::stt::transcribe::{SamplingStrategy, Segment, TranscribeParams, TranscriptionResult};
use crate::types::Language;

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the STT subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("speech model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a `WhisperContext` or `WhisperState`.
    #[error("Whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// An error occurred during the inference pass.
    #[error("transcription error: {0}")]
    Transcription(String),

    /// Shorter than 0.5 s (8 000 samples at 16 kHz).
    #[error("recording too short — minimum 0.5 s")]
    AudioTooShort,

    /// Longer than 10 min (9 600 000 samples at 16 kHz).
    #[error("recording too long — maximum 10 min")]
    AudioTooLong,

    /// Inference finished but produced no words.
    #[error("no speech recognised in recording")]
    NoSpeech,
}

// ---------------------------------------------------------------------------
// SttEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-to-text engines.
///
/// # Contract
///
/// - `audio` must be **16 kHz, mono, f32** PCM samples.
/// - `audio.len() < 8_000` → `Err(SttError::AudioTooShort)`.
/// - `audio.len() > 9_600_000` → `Err(SttError::AudioTooLong)`.
/// - A blank transcript is `Err(SttError::NoSpeech)`, never `Ok("")`.
pub trait SttEngine: Send + Sync {
    /// Transcribe `audio` spoken in `language`.
    fn transcribe(&self, audio: &[f32], language: Language) -> Result<String, SttError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SttEngine>) {}
};

/// 0.5 s × 16 000 Hz.
pub(crate) const MIN_AUDIO_SAMPLES: usize = 8_000;
/// 600 s × 16 000 Hz.
pub(crate) const MAX_AUDIO_SAMPLES: usize = 9_600_000;

fn check_length(audio: &[f32]) -> Result<(), SttError> {
    if audio.len() < MIN_AUDIO_SAMPLES {
        return Err(SttError::AudioTooShort);
    }
    if audio.len() > MAX_AUDIO_SAMPLES {
        return Err(SttError::AudioTooLong);
    }
    Ok(())
}

/// Whisper marks silent stretches with bracketed tags like `[BLANK_AUDIO]`.
fn is_blank_transcript(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || (trimmed.starts_with('[') && trimmed.ends_with(']') && !trimmed[1..].contains('['))
}

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// Production STT engine that wraps a `whisper_rs::WhisperContext`.
///
/// A new `WhisperState` is created for every call so the engine can be
/// shared across threads without locking.
pub struct WhisperEngine {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs; the model
// weights are read-only after loading.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    /// Load a GGML model from `model_path`.
    ///
    /// # Errors
    ///
    /// - [`SttError::ModelNotFound`] — `model_path` does not exist.
    /// - [`SttError::ContextInit`]  — whisper-rs failed to load the file.
    pub fn load(model_path: impl AsRef<Path>, params: TranscribeParams) -> Result<Self, SttError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            SttError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(params.use_gpu);
        let ctx = WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        Ok(Self { ctx, params })
    }

    /// Transcribe with per-segment timing information.
    pub fn transcribe_full(
        &self,
        audio: &[f32],
        language: Language,
    ) -> Result<TranscriptionResult, SttError> {
        check_length(audio)?;

        use whisper_rs::SamplingStrategy as WS;
        let ws = match self.params.strategy {
            SamplingStrategy::Greedy { best_of } => WS::Greedy { best_of },
            SamplingStrategy::BeamSearch { beam_size, patience } => {
                WS::BeamSearch { beam_size, patience }
            }
        };

        let mut fp = FullParams::new(ws);
        fp.set_language(Some(language.code()));
        fp.set_n_threads(self.params.n_threads);

        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
        }

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        let wall_start = std::time::Instant::now();

        state
            .full(fp, audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        let mut segments: Vec<Segment> = Vec::with_capacity(n_segments.max(0) as usize);

        for i in 0..n_segments {
            let seg_text = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;

            // Centiseconds → milliseconds.
            let t0 = state.full_get_segment_t0(i).unwrap_or(0).max(0) as u64 * 10;
            let t1 = state.full_get_segment_t1(i).unwrap_or(0).max(0) as u64 * 10;

            text.push_str(&seg_text);
            segments.push(Segment {
                text: seg_text,
                start_ms: t0,
                end_ms: t1,
            });
        }

        Ok(TranscriptionResult {
            text: text.trim().to_string(),
            segments,
            duration_ms: wall_start.elapsed().as_millis(),
        })
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(&self, audio: &[f32], language: Language) -> Result<String, SttError> {
        let result = self.transcribe_full(audio, language)?;
        log::debug!(
            "stt: {} segment(s) in {} ms",
            result.segments.len(),
            result.duration_ms
        );
        if is_blank_transcript(&result.text) {
            return Err(SttError::NoSpeech);
        }
        Ok(result.text)
    }
}

// ---------------------------------------------------------------------------
// UnavailableStt
// ---------------------------------------------------------------------------

/// Placeholder engine used when the model could not be loaded.
#[derive(Debug, Clone)]
pub struct UnavailableStt {
    reason: SttError,
}

impl UnavailableStt {
    pub fn new(reason: SttError) -> Self {
        Self { reason }
    }
}

impl SttEngine for UnavailableStt {
    fn transcribe(&self, _audio: &[f32], _language: Language) -> Result<String, SttError> {
        Err(self.reason.clone())
    }
}

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------

/// Returns a pre-configured response without loading any model file.
#[cfg(test)]
pub struct MockSttEngine {
    response: Result<String, SttError>,
}

#[cfg(test)]
impl MockSttEngine {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(&self, audio: &[f32], _language: Language) -> Result<String, SttError> {
        // Enforce the length contract so callers are tested against it.
        check_length(audio)?;
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
