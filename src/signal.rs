//! Loudness scoring against an adaptive noise floor.
//!
//! Scores are expressed as a signal-to-noise ratio in dB relative to the current floor:
//! - `0.0` means "at or below the floor" (including digital silence and empty input).
//! - Positive values mean louder than the floor.
//!
//! The score is clamped at zero from below so it stays monotonic non-decreasing in
//! amplitude: a quieter-than-floor frame never outranks silence.

use crate::audio::Frame;

/// Default SNR at which a frame counts as the onset of speech.
pub const DEFAULT_TRIGGER_SNR_DB: f32 = 10.0;

/// Default SNR at or below which a candidate or a command recording counts as silent.
pub const DEFAULT_RELEASE_SNR_DB: f32 = 3.0;

/// Root-mean-square of every sample in `frames`.
///
/// Returns `0.0` for empty input.
pub fn rms(frames: &[Frame]) -> f32 {
    let mut sum_squares = 0f64;
    let mut count = 0usize;

    for frame in frames {
        for &sample in frame.samples() {
            let s = sample as f64;
            sum_squares += s * s;
        }
        count += frame.len();
    }

    if count == 0 {
        return 0.0;
    }

    (sum_squares / count as f64).sqrt() as f32
}

/// The rolling noise-floor estimate for one listening session.
///
/// Mutated only by the thread that consumes the frame stream.
#[derive(Debug, Clone, Default)]
pub struct SignalLevel {
    threshold: f32,
}

impl SignalLevel {
    /// An uncalibrated estimator. Every score is `0.0` until the first update.
    pub fn new() -> Self {
        Self::default()
    }

    /// An estimator with a known floor (useful when the environment is already calibrated).
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold: threshold.max(0.0),
        }
    }

    /// Current noise floor, in RMS sample units.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_calibrated(&self) -> bool {
        self.threshold > 0.0
    }

    /// Recompute the floor from a window of background frames.
    pub fn update_threshold(&mut self, frames: &[Frame]) {
        self.threshold = rms(frames);
    }

    /// SNR of `frames` against the floor, in dB, clamped at `0.0`.
    pub fn score(&self, frames: &[Frame]) -> f32 {
        let level = rms(frames);
        if level <= 0.0 || self.threshold <= 0.0 {
            return 0.0;
        }
        (20.0 * (level / self.threshold).log10()).max(0.0)
    }

    /// Convenience wrapper for scoring a single frame.
    pub fn score_frame(&self, frame: &Frame) -> f32 {
        self.score(std::slice::from_ref(frame))
    }
}
