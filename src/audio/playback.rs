//! Reply playback via `cpal`.
//!
//! [`AudioPlayer`] wraps the cpal host/device lifecycle for the default
//! output device.  [`AudioPlayer::play`] returns a [`PlaybackHandle`]: a RAII
//! guard that keeps the stream alive.  Dropping it stops playback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::decode::DecodedAudio;
use super::resample::{resample, stereo_to_mono};
use super::AudioError;

// ---------------------------------------------------------------------------
// PlaybackHandle
// ---------------------------------------------------------------------------

/// Keeps a playing cpal stream alive.
///
/// `cpal::Stream` is not `Send` on every platform, so the handle stays on
/// the thread that started playback (the UI thread).
pub struct PlaybackHandle {
    _stream: cpal::Stream,
    finished: Arc<AtomicBool>,
}

impl PlaybackHandle {
    /// `true` once every sample has been handed to the device.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// AudioPlayer
// ---------------------------------------------------------------------------

/// Output device wrapper built on top of `cpal`.
pub struct AudioPlayer {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl AudioPlayer {
    /// Open the system default output device with its preferred config.
    ///
    /// # Errors
    ///
    /// [`AudioError::NoDevice`] when no output device is available, or
    /// [`AudioError::Playback`] when it cannot report a stream config.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start playing `audio`; returns immediately.
    ///
    /// The audio is downmixed to mono, resampled to the device rate and
    /// duplicated across every output channel.  Silence is written after the
    /// last sample.
    pub fn play(&self, audio: &DecodedAudio) -> Result<PlaybackHandle, AudioError> {
        let mono = stereo_to_mono(&audio.samples, audio.channels);
        let samples = resample(&mono, audio.sample_rate, self.sample_rate);
        let channels = (self.channels as usize).max(1);

        let finished = Arc::new(AtomicBool::new(samples.is_empty()));
        let finished_cb = Arc::clone(&finished);
        let mut pos = 0usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let sample = samples.get(pos).copied().unwrap_or(0.0);
                        pos += 1;
                        frame.fill(sample);
                    }
                    if pos >= samples.len() {
                        finished_cb.store(true, Ordering::Relaxed);
                    }
                },
                |err: cpal::StreamError| {
                    log::error!("cpal output stream error: {err}");
                },
                None,
            )
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        log::debug!(
            "playback: {:.1}s at {} Hz x{} ch",
            audio.duration_secs(),
            self.sample_rate,
            self.channels
        );

        Ok(PlaybackHandle {
            _stream: stream,
            finished,
        })
    }

    /// Native sample rate of the output device in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
