use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::audio::AudioFormat;
use crate::signal::{DEFAULT_RELEASE_SNR_DB, DEFAULT_TRIGGER_SNR_DB};
use crate::{Error, Result};

/// Options that control how the assistant listens, dispatches and compiles vocabularies.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input (and an optional JSON profile) into this
/// type, and the result is passed explicitly into `AudioMic`, `Brain` and `Conversation`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Opts {
    /// Wake word. Matched case-insensitively as a substring of passive transcripts.
    pub keyword: String,

    /// Language used to select the standard phrase set (e.g. `"en"`).
    pub language: String,

    /// Capture format for the whole session.
    pub audio: AudioFormat,

    /// Activity-detection tuning.
    pub listen: ListenOpts,

    /// Root directory holding one sub-directory per compiled vocabulary.
    pub vocabulary_dir: PathBuf,

    /// Replaces the embedded standard phrase list for `language`.
    pub standard_phrases_path: Option<PathBuf>,

    /// WAV played before a command is recorded. A synthesized high tone when unset.
    pub start_cue_path: Option<PathBuf>,

    /// WAV played after a command is recorded. A synthesized low tone when unset.
    pub stop_cue_path: Option<PathBuf>,

    /// Spoken instead of the start cue when set (e.g. "Yes?").
    pub active_reply: Option<String>,

    /// Spoken instead of the stop cue when set (e.g. "One moment.").
    pub active_response: Option<String>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            keyword: "JASPER".to_owned(),
            language: "en".to_owned(),
            audio: AudioFormat::default(),
            listen: ListenOpts::default(),
            vocabulary_dir: PathBuf::from("vocabularies"),
            standard_phrases_path: None,
            start_cue_path: None,
            stop_cue_path: None,
            active_reply: None,
            active_response: None,
        }
    }
}

impl Opts {
    /// Load a JSON profile. Missing fields fall back to their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|err| Error::io("failed to open configuration", path, err))?;
        let opts: Opts = serde_json::from_reader(BufReader::new(file))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check cross-field invariants that serde can't express.
    pub fn validate(&self) -> Result<()> {
        if self.keyword.trim().is_empty() {
            return Err(Error::config("keyword must not be empty"));
        }
        self.audio.validate()?;
        self.listen.validate()
    }
}

/// Tuning knobs for passive (keyword) and active (command) listening.
///
/// Frame counts are in device frames; SNR values are in dB over the noise floor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenOpts {
    /// A single frame at or above this SNR starts a keyword candidate.
    pub trigger_snr_db: f32,

    /// A candidate whose trailing window is at or below this SNR is complete.
    pub release_snr_db: f32,

    /// A command recording whose trailing window is at or below this SNR is complete.
    pub silence_snr_db: f32,

    /// Rolling history length; also the background window used to recompute the floor.
    pub history_frames: usize,

    /// History frames prepended to a new candidate so the speech onset isn't clipped.
    pub onset_frames: usize,

    /// Candidates are only checked for release once they exceed this many frames.
    pub min_candidate_frames: usize,

    /// Hard cap on candidate length.
    pub max_candidate_frames: usize,

    /// Trailing frames scored when checking for candidate release.
    pub release_window_frames: usize,

    /// Silence window for command recording; the hard cap is twice this.
    pub active_timeout_secs: f32,

    /// Passive transcription worker threads.
    pub keyword_workers: usize,

    /// Consecutive device read errors tolerated before giving up.
    pub max_read_errors: usize,

    /// Sleep between checks while the conversation is suspended.
    pub suspend_poll_ms: u64,
}

impl Default for ListenOpts {
    fn default() -> Self {
        Self {
            trigger_snr_db: DEFAULT_TRIGGER_SNR_DB,
            release_snr_db: DEFAULT_RELEASE_SNR_DB,
            silence_snr_db: DEFAULT_RELEASE_SNR_DB,
            history_frames: 16,
            onset_frames: 10,
            min_candidate_frames: 20,
            max_candidate_frames: 60,
            release_window_frames: 10,
            active_timeout_secs: 3.0,
            keyword_workers: 2,
            max_read_errors: 50,
            suspend_poll_ms: 100,
        }
    }
}

impl ListenOpts {
    pub fn validate(&self) -> Result<()> {
        if self.history_frames == 0 {
            return Err(Error::config("history_frames must be at least 1"));
        }
        if self.onset_frames > self.history_frames {
            return Err(Error::config(format!(
                "onset_frames ({}) cannot exceed history_frames ({})",
                self.onset_frames, self.history_frames
            )));
        }
        if self.min_candidate_frames >= self.max_candidate_frames {
            return Err(Error::config(format!(
                "min_candidate_frames ({}) must be below max_candidate_frames ({})",
                self.min_candidate_frames, self.max_candidate_frames
            )));
        }
        if self.release_window_frames == 0 {
            return Err(Error::config("release_window_frames must be at least 1"));
        }
        if self.active_timeout_secs.is_nan() || self.active_timeout_secs <= 0.0 {
            return Err(Error::config("active_timeout_secs must be positive"));
        }
        if self.release_snr_db > self.trigger_snr_db {
            return Err(Error::config(
                "release_snr_db must not exceed trigger_snr_db",
            ));
        }
        Ok(())
    }

    pub fn active_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.active_timeout_secs)
    }

    pub fn suspend_poll(&self) -> Duration {
        Duration::from_millis(self.suspend_poll_ms)
    }

    /// Worker count clamped to `[1, available CPUs]`.
    pub fn worker_count(&self) -> usize {
        self.keyword_workers.clamp(1, num_cpus::get().max(1))
    }
}
