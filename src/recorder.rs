//! Active listening: record one command after the wake word.
//!
//! With `n` frames covering the timeout, recording stops at whichever comes first:
//! - `2n` frames (hard cap, independent of the signal)
//! - at least `n` frames, and the trailing `n` frames score at or below the silence SNR

use std::io;
use std::time::Duration;

use tracing::{debug, warn};

use crate::audio::{AudioFormat, Frame, Recording};
use crate::mic::Cancellation;
use crate::opts::ListenOpts;
use crate::signal::SignalLevel;
use crate::{Error, Result};

/// Why a command recording stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cutoff {
    /// The trailing window fell to the silence threshold.
    Silence,
    /// The `2n` cap was reached.
    HardCap,
    /// The frame stream ended first.
    StreamEnded,
    /// The cancellation flag was raised.
    Cancelled,
}

/// A finished command recording.
#[derive(Debug, Clone)]
pub struct Captured {
    pub recording: Recording,
    pub cutoff: Cutoff,
}

/// Silence-cutoff recorder for commands.
#[derive(Debug, Clone)]
pub struct ActiveRecorder {
    silence_snr_db: f32,
    max_read_errors: usize,
}

impl ActiveRecorder {
    pub fn new(opts: &ListenOpts) -> Self {
        Self {
            silence_snr_db: opts.silence_snr_db,
            max_read_errors: opts.max_read_errors,
        }
    }

    /// Record from `frames` until silence, the hard cap, the end of the stream, or `cancel`.
    ///
    /// `level` is only read: the floor calibrated during passive listening is the reference.
    pub fn record_until_silence<I>(
        &self,
        frames: I,
        level: &SignalLevel,
        format: AudioFormat,
        timeout: Duration,
        cancel: &Cancellation,
    ) -> Result<Captured>
    where
        I: IntoIterator<Item = io::Result<Frame>>,
    {
        let n = format.frames_for(timeout);
        let cap = 2 * n;
        let mut buf: Vec<Frame> = Vec::with_capacity(cap);
        let mut read_errors = 0usize;

        let mut cutoff = Cutoff::StreamEnded;
        for item in frames {
            if cancel.is_cancelled() {
                cutoff = Cutoff::Cancelled;
                break;
            }

            match item {
                Ok(frame) => {
                    read_errors = 0;
                    buf.push(frame);
                }
                Err(err) => {
                    read_errors += 1;
                    warn!(error = %err, consecutive = read_errors, "skipping unreadable frame");
                    if read_errors > self.max_read_errors {
                        return Err(Error::device(format!(
                            "{read_errors} consecutive read errors, last: {err}"
                        )));
                    }
                    continue;
                }
            }

            if buf.len() >= cap {
                cutoff = Cutoff::HardCap;
                break;
            }
            if buf.len() >= n {
                let snr = level.score(&buf[buf.len() - n..]);
                if snr <= self.silence_snr_db {
                    cutoff = Cutoff::Silence;
                    break;
                }
            }
        }

        debug!(frames = buf.len(), window = n, ?cutoff, "command recording finished");
        Ok(Captured {
            recording: Recording::new(format, buf),
            cutoff,
        })
    }
}
