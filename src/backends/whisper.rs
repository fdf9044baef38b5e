use std::os::raw::{c_char, c_void};
use std::path::Path;
use std::sync::Once;

use anyhow::{Context, ensure};
use tracing::debug;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::Result;
use crate::audio::Recording;
use crate::backend::SpeechToText;

const SAMPLE_RATE: u32 = 16_000;

/// Local transcription with a whisper.cpp model.
///
/// Expects 16 kHz mono recordings (the default capture format). The whole transcript is
/// returned as a single hypothesis.
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    language: Option<String>,
}

impl WhisperTranscriber {
    pub fn new(model_path: &Path, language: Option<&str>) -> Result<Self> {
        init_whisper_logging();

        let ctx = WhisperContext::new_with_params(
            &model_path.to_string_lossy(),
            WhisperContextParameters::default(),
        )
        .with_context(|| format!("failed to load model from path: {}", model_path.display()))?;

        Ok(Self {
            ctx,
            language: language.map(str::to_owned),
        })
    }

    fn run(&self, audio: &Recording) -> anyhow::Result<String> {
        let format = audio.format();
        ensure!(
            format.sample_rate == SAMPLE_RATE && format.channels == 1,
            "whisper expects 16 kHz mono audio, got {} Hz x{}",
            format.sample_rate,
            format.channels
        );

        let samples: Vec<f32> = audio
            .samples()
            .map(|s| f32::from(s) / f32::from(i16::MAX))
            .collect();

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(num_cpus::get() as i32);
        params.set_language(self.language.as_deref());
        params.set_no_context(true);
        params.set_single_segment(true);
        params.set_print_progress(false);
        params.set_print_special(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        let mut state = self
            .ctx
            .create_state()
            .context("failed to create whisper state")?;
        state
            .full(params, &samples)
            .context("failed to run whisper full()")?;

        let mut text = String::new();
        for segment in state.as_iter() {
            text.push_str(segment.to_str().context("failed to get segment text")?);
        }
        Ok(text.trim().to_owned())
    }
}

impl SpeechToText for WhisperTranscriber {
    fn name(&self) -> &'static str {
        "whisper"
    }

    fn transcribe(&self, audio: &Recording) -> Result<Vec<String>> {
        if audio.is_empty() {
            return Ok(Vec::new());
        }
        let text = self.run(audio)?;
        debug!(frames = audio.len(), %text, "whisper transcript");
        Ok(if text.is_empty() { Vec::new() } else { vec![text] })
    }
}

unsafe extern "C" fn whisper_log_callback(
    _level: u32,
    _c_msg: *const c_char,
    _user_data: *mut c_void,
) {
}

/// Silence whisper.cpp's own logging, once per process.
fn init_whisper_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    });
}
