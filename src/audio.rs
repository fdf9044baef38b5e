//! Audio primitives shared by the listening pipeline.
//!
//! Responsibilities:
//! - Describe the session-wide capture format (`AudioFormat`)
//! - Carry PCM chunks (`Frame`) and ordered buffers of them (`Recording`)
//! - Define the device seam (`AudioDevice`) used for both recording and playback
//!
//! Notes:
//! - Only 16-bit signed PCM is supported. The format is fixed for a session, so frames
//!   carry samples only.

use std::f32::consts::PI;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

/// The PCM layout used for a listening session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AudioFormat {
    /// Samples per second, per channel.
    pub sample_rate: u32,

    /// Interleaved channel count.
    pub channels: u16,

    /// Bits per sample. Must be 16.
    pub bits_per_sample: u16,

    /// Samples per channel in one frame.
    pub frames_per_chunk: usize,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            bits_per_sample: 16,
            frames_per_chunk: 1024,
        }
    }
}

impl AudioFormat {
    pub fn validate(&self) -> Result<()> {
        if self.bits_per_sample != 16 {
            return Err(Error::config(format!(
                "only 16-bit PCM is supported, got {} bits",
                self.bits_per_sample
            )));
        }
        if self.sample_rate == 0 || self.channels == 0 || self.frames_per_chunk == 0 {
            return Err(Error::config(
                "sample rate, channel count and chunk size must be non-zero",
            ));
        }
        Ok(())
    }

    /// How many frames the device produces per second of audio.
    pub fn frames_per_second(&self) -> f32 {
        self.sample_rate as f32 / self.frames_per_chunk as f32
    }

    /// Number of frames covering `duration`, rounded to the nearest frame (at least one).
    pub fn frames_for(&self, duration: Duration) -> usize {
        let frames = (self.frames_per_second() * duration.as_secs_f32()).round() as usize;
        frames.max(1)
    }

    /// Number of interleaved samples in one frame.
    pub fn samples_per_frame(&self) -> usize {
        self.frames_per_chunk * self.channels as usize
    }

    pub(crate) fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

/// One chunk of interleaved 16-bit PCM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    samples: Vec<i16>,
}

impl Frame {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// A frame where every sample has the same value.
    pub fn constant(len: usize, value: i16) -> Self {
        Self {
            samples: vec![value; len],
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

impl From<Vec<i16>> for Frame {
    fn from(samples: Vec<i16>) -> Self {
        Self::new(samples)
    }
}

/// An ordered buffer of frames sharing one format.
///
/// Recordings are frozen once handed to a transcriber; they are never mutated across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    format: AudioFormat,
    frames: Vec<Frame>,
}

impl Recording {
    pub fn new(format: AudioFormat, frames: Vec<Frame>) -> Self {
        Self { format, frames }
    }

    pub fn empty(format: AudioFormat) -> Self {
        Self::new(format, Vec::new())
    }

    /// Split interleaved samples into frames of `format.samples_per_frame()` samples.
    ///
    /// The final frame may be shorter.
    pub fn from_samples(format: AudioFormat, samples: &[i16]) -> Self {
        let per_frame = format.samples_per_frame().max(1);
        let frames = samples
            .chunks(per_frame)
            .map(|chunk| Frame::new(chunk.to_vec()))
            .collect();
        Self { format, frames }
    }

    /// Synthesize a sine tone, used for the audible start/stop cues.
    pub fn tone(format: AudioFormat, frequency_hz: f32, duration: Duration, amplitude: f32) -> Self {
        let amplitude = amplitude.clamp(0.0, 1.0) * i16::MAX as f32;
        let total = (format.sample_rate as f32 * duration.as_secs_f32()).round() as usize;
        let channels = format.channels as usize;

        let mut samples = Vec::with_capacity(total * channels);
        for n in 0..total {
            let t = n as f32 / format.sample_rate as f32;
            let value = (amplitude * (2.0 * PI * frequency_hz * t).sin()) as i16;
            samples.extend(std::iter::repeat_n(value, channels));
        }

        Self::from_samples(format, &samples)
    }

    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterate every interleaved sample in order.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.frames.iter().flat_map(|f| f.samples().iter().copied())
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Playback duration of the buffered audio.
    pub fn duration(&self) -> Duration {
        let samples: usize = self.frames.iter().map(Frame::len).sum();
        let per_second = self.format.sample_rate as f64 * self.format.channels as f64;
        Duration::from_secs_f64(samples as f64 / per_second)
    }
}

/// A lazy frame sequence produced by [`AudioDevice::record`].
///
/// Items are `io::Result` so a single failed read can be skipped by the caller.
pub type FrameStream<'a> = Box<dyn Iterator<Item = std::io::Result<Frame>> + 'a>;

/// The audio hardware seam.
///
/// Implementations wrap a real capture/playback device; tests use scripted fakes.
pub trait AudioDevice {
    /// Open a capture stream in `format`.
    ///
    /// The stream is expected to be effectively infinite; a stream that ends is treated as
    /// "input closed" by the listeners.
    fn record(&mut self, format: &AudioFormat) -> Result<FrameStream<'_>>;

    /// Play a buffer to completion.
    fn play(&mut self, audio: &Recording) -> Result<()>;

    /// Play a WAV file from disk.
    fn play_file(&mut self, path: &Path) -> Result<()> {
        let recording = crate::wav::read_recording_from_path(path, 1024)?;
        self.play(&recording)
    }
}
