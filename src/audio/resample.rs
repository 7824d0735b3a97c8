//! Audio resampling and channel mixing utilities.
//!
//! Two consumers need converted audio:
//!
//! * Whisper requires **16 kHz mono `f32`** ([`resample_to_16k`]).
//! * The reply player feeds the output device at its native rate
//!   ([`resample`] with the device rate as target).
//!
//! The resampler uses linear interpolation, which is plenty for speech.

/// Sample rate Whisper expects.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging all channels.
///
/// The output length is `samples.len() / channels`.
///
/// * If `channels == 1` the input slice is returned as an owned `Vec`.
/// * If `channels == 0` an empty vector is returned.
///
/// # Example
///
/// ```rust
/// use smart_assistant::audio::stereo_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = stereo_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.0).abs() < 1e-6);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` Hz to `target_rate` Hz using
/// linear interpolation.
///
/// * Equal rates return a copy of the input.
/// * Empty input, or a zero rate on either side, returns an empty vector.
///
/// The output length is `ceil(samples.len() * target_rate / source_rate)`.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate {
        return samples.to_vec();
    }

    if samples.is_empty() || source_rate == 0 || target_rate == 0 {
        return Vec::new();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f64;

        let sample = if idx + 1 < samples.len() {
            samples[idx] * (1.0 - frac as f32) + samples[idx + 1] * frac as f32
        } else if idx < samples.len() {
            samples[idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

/// Resample mono `samples` from `source_rate` Hz to 16 000 Hz.
///
/// ```rust
/// use smart_assistant::audio::resample_to_16k;
///
/// let hi = vec![0.5_f32; 480];
/// let lo = resample_to_16k(&hi, 48_000);
/// assert_eq!(lo.len(), 160);
/// ```
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    resample(samples, source_rate, WHISPER_SAMPLE_RATE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
