use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::Result;
use crate::audio::{AudioDevice, AudioFormat, Recording};
use crate::backend::{SpeechToText, TextToSpeech};
use crate::keyword::{KeywordDetector, Wake};
use crate::opts::Opts;
use crate::recorder::{ActiveRecorder, Cutoff};
use crate::signal::SignalLevel;
use crate::wav::read_recording_from_path;

use super::{Cancellation, Mic};

const START_CUE_HZ: f32 = 880.0;
const STOP_CUE_HZ: f32 = 440.0;
const CUE_DURATION: Duration = Duration::from_millis(120);
const CUE_AMPLITUDE: f32 = 0.3;

/// A microphone backed by a real (or simulated) audio device.
///
/// `AudioMic` owns the long-lived listening resources:
/// - the device
/// - the keyword detector and its worker pool (sharing the passive transcriber)
/// - the noise floor, carried across `listen` calls
/// - the active transcriber and the speech synthesizer
pub struct AudioMic<D: AudioDevice> {
    device: D,
    format: AudioFormat,
    level: SignalLevel,
    detector: KeywordDetector,
    recorder: ActiveRecorder,
    active_stt: Box<dyn SpeechToText>,
    tts: Box<dyn TextToSpeech>,
    start_cue: Recording,
    stop_cue: Recording,
    active_reply: Option<String>,
    active_response: Option<String>,
    timeout: Duration,
    cancel: Cancellation,
}

impl<D: AudioDevice> AudioMic<D> {
    /// Build a microphone from validated options.
    ///
    /// Configured cue files are loaded here so a bad path fails at startup rather than
    /// on the first command.
    pub fn new(
        device: D,
        passive_stt: Arc<dyn SpeechToText + Send + Sync>,
        active_stt: Box<dyn SpeechToText>,
        tts: Box<dyn TextToSpeech>,
        opts: &Opts,
    ) -> Result<Self> {
        opts.validate()?;
        let format = opts.audio;

        let start_cue = match &opts.start_cue_path {
            Some(path) => read_recording_from_path(path, format.frames_per_chunk)?,
            None => Recording::tone(format, START_CUE_HZ, CUE_DURATION, CUE_AMPLITUDE),
        };
        let stop_cue = match &opts.stop_cue_path {
            Some(path) => read_recording_from_path(path, format.frames_per_chunk)?,
            None => Recording::tone(format, STOP_CUE_HZ, CUE_DURATION, CUE_AMPLITUDE),
        };

        let detector = KeywordDetector::new(&opts.keyword, passive_stt, &opts.listen)?;

        info!(
            keyword = %opts.keyword,
            sample_rate = format.sample_rate,
            chunk = format.frames_per_chunk,
            "audio mic ready"
        );

        Ok(Self {
            device,
            format,
            level: SignalLevel::new(),
            detector,
            recorder: ActiveRecorder::new(&opts.listen),
            active_stt,
            tts,
            start_cue,
            stop_cue,
            active_reply: opts.active_reply.clone(),
            active_response: opts.active_response.clone(),
            timeout: opts.listen.active_timeout(),
            cancel: Cancellation::new(),
        })
    }

    /// Start from a known noise floor instead of calibrating on the first second of audio.
    pub fn with_signal_level(mut self, level: SignalLevel) -> Self {
        self.level = level;
        self
    }

    pub fn signal_level(&self) -> &SignalLevel {
        &self.level
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Block on the device until the keyword is heard, the wait is cancelled, or input ends.
    pub fn wait_for_keyword(&mut self) -> Result<Wake> {
        let stream = self.device.record(&self.format)?;
        self.detector
            .wait_for_keyword(stream, &mut self.level, self.format, &self.cancel)
    }

    fn cue(&mut self, reply: Option<String>, start: bool) {
        let res = match reply {
            Some(text) => self.say(&text),
            None if start => self.device.play(&self.start_cue),
            None => self.device.play(&self.stop_cue),
        };
        if let Err(err) = res {
            warn!(error = %err, start, "failed to play listening cue");
        }
    }
}

impl<D: AudioDevice> Mic for AudioMic<D> {
    fn listen(&mut self) -> Result<Option<Vec<String>>> {
        match self.wait_for_keyword()? {
            Wake::Detected => self.active_listen(self.timeout).map(Some),
            Wake::Cancelled => Ok(Some(Vec::new())),
            Wake::Exhausted => Ok(None),
        }
    }

    fn active_listen(&mut self, timeout: Duration) -> Result<Vec<String>> {
        if self.cancel.is_cancelled() {
            return Ok(Vec::new());
        }

        self.cue(self.active_reply.clone(), true);

        let captured = {
            let stream = self.device.record(&self.format)?;
            self.recorder.record_until_silence(
                stream,
                &self.level,
                self.format,
                timeout,
                &self.cancel,
            )?
        };

        self.cue(self.active_response.clone(), false);

        if captured.cutoff == Cutoff::Cancelled || captured.recording.is_empty() {
            return Ok(Vec::new());
        }

        match self.active_stt.transcribe(&captured.recording) {
            Ok(texts) => {
                debug!(?texts, engine = self.active_stt.name(), "command transcribed");
                Ok(texts)
            }
            Err(err) => {
                warn!(engine = self.active_stt.name(), error = %err, "active transcription failed");
                Ok(Vec::new())
            }
        }
    }

    fn say(&mut self, phrase: &str) -> Result<()> {
        info!(phrase, "saying");
        let audio = self.tts.say(phrase)?;
        self.device.play(&audio)
    }

    fn cancellation(&self) -> Option<Cancellation> {
        Some(self.cancel.clone())
    }
}
