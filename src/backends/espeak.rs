use std::process::Command;

use tracing::debug;

use crate::audio::Recording;
use crate::backend::TextToSpeech;
use crate::wav::read_recording_from_path;
use crate::{Error, Result};

/// Speech synthesis through the `espeak` command-line tool.
///
/// `espeak -w <file>` renders into a temporary WAV file which is read back as a
/// [`Recording`] in espeak's native format.
#[derive(Debug, Clone)]
pub struct EspeakSpeech {
    program: String,
    voice: Option<String>,
    words_per_minute: Option<u32>,
    frames_per_chunk: usize,
}

impl Default for EspeakSpeech {
    fn default() -> Self {
        Self {
            program: "espeak".to_owned(),
            voice: None,
            words_per_minute: None,
            frames_per_chunk: 1024,
        }
    }
}

impl EspeakSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different binary, e.g. `espeak-ng`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_words_per_minute(mut self, wpm: u32) -> Self {
        self.words_per_minute = Some(wpm);
        self
    }

    fn command(&self, wav: &std::path::Path, text: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-w").arg(wav);
        if let Some(voice) = &self.voice {
            cmd.arg("-v").arg(voice);
        }
        if let Some(wpm) = self.words_per_minute {
            cmd.arg("-s").arg(wpm.to_string());
        }
        cmd.arg("--").arg(text);
        cmd
    }
}

impl TextToSpeech for EspeakSpeech {
    fn name(&self) -> &'static str {
        "espeak"
    }

    fn say(&self, text: &str) -> Result<Recording> {
        let wav = tempfile::Builder::new()
            .prefix("jasper-tts-")
            .suffix(".wav")
            .tempfile()?;

        let output = self
            .command(wav.path(), text)
            .output()
            .map_err(|err| Error::backend("espeak", format!("failed to run '{}': {err}", self.program)))?;
        if !output.status.success() {
            return Err(Error::backend(
                "espeak",
                format!(
                    "'{}' exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let audio = read_recording_from_path(wav.path(), self.frames_per_chunk)?;
        debug!(chars = text.len(), duration = ?audio.duration(), "synthesized speech");
        Ok(audio)
    }
}
