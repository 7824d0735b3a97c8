//! Audio helpers — WAV decoding, channel mixing / resampling, playback.
//!
//! # Paths through this module
//!
//! ```text
//! uploaded .wav  → decode_wav → to_whisper_input (mono, 16 kHz) → STT
//! reply .wav     → decode_wav_file → AudioPlayer::play (device rate) → speakers
//! ```

pub mod decode;
pub mod playback;
pub mod resample;

pub use decode::{decode_wav, decode_wav_file, DecodedAudio};
pub use playback::{AudioPlayer, PlaybackHandle};
pub use resample::{resample, resample_to_16k, stereo_to_mono, WHISPER_SAMPLE_RATE};

use thiserror::Error;

/// Errors raised while decoding or playing audio.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("cannot decode WAV audio: {0}")]
    Decode(String),

    #[error("unsupported WAV layout: {0}")]
    Unsupported(String),

    #[error("no audio output device found on the default host")]
    NoDevice,

    #[error("audio playback failed: {0}")]
    Playback(String),
}
