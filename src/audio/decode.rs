//! WAV decoding via `hound`.
//!
//! Both the speech-to-text path (uploaded recordings) and the reply player
//! start from [`decode_wav`], which normalises every supported sample format
//! to interleaved `f32` in `[-1.0, 1.0]`.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader};

use super::resample::{resample_to_16k, stereo_to_mono};
use super::AudioError;

/// Decoded PCM audio.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }

    /// 16 kHz mono samples ready for Whisper.
    pub fn to_whisper_input(&self) -> Vec<f32> {
        let mono = stereo_to_mono(&self.samples, self.channels);
        resample_to_16k(&mono, self.sample_rate)
    }
}

/// Decode an in-memory WAV file.
///
/// Supports 8/16/24/32-bit integer PCM and 32-bit float.
///
/// # Errors
///
/// [`AudioError::Decode`] when the header or sample data is invalid,
/// [`AudioError::Unsupported`] for sample layouts `hound` can read but that
/// this decoder does not normalise.
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio, AudioError> {
    let mut reader =
        WavReader::new(Cursor::new(bytes)).map_err(|e| AudioError::Decode(e.to_string()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| AudioError::Decode(e.to_string()))?,
        (SampleFormat::Int, bits @ 8..=32) => {
            let scale = 1.0 / (1_i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .map_err(|e| AudioError::Decode(e.to_string()))?
        }
        (format, bits) => {
            return Err(AudioError::Unsupported(format!(
                "{bits}-bit {format:?} samples"
            )))
        }
    };

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Read and decode a WAV file from disk.
pub fn decode_wav_file(path: &Path) -> Result<DecodedAudio, AudioError> {
    let bytes =
        std::fs::read(path).map_err(|e| AudioError::Decode(format!("{}: {e}", path.display())))?;
    decode_wav(&bytes)
}
