use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tracing::debug;

use crate::audio::Recording;
use crate::backend::SpeechToText;
use crate::{Error, Result};

/// Returns pre-recorded transcripts in order, ignoring the audio.
///
/// Once the script runs out every transcription is empty ("nothing recognized").
#[derive(Debug, Default)]
pub struct ReplayTranscriber {
    results: Mutex<VecDeque<Vec<String>>>,
}

impl ReplayTranscriber {
    pub fn new(results: impl IntoIterator<Item = Vec<String>>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
        }
    }

    /// Parse a script: one result per line, hypotheses separated by `|`.
    ///
    /// A blank line is a result with no hypotheses. `#` lines are comments.
    pub fn from_script(script: &str) -> Self {
        Self::new(
            script
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#'))
                .map(|line| {
                    line.split('|')
                        .map(str::trim)
                        .filter(|h| !h.is_empty())
                        .map(str::to_owned)
                        .collect()
                }),
        )
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let script = fs::read_to_string(path)
            .map_err(|err| Error::io("failed to read transcript script", path, err))?;
        Ok(Self::from_script(&script))
    }

    /// Results not yet handed out.
    pub fn remaining(&self) -> usize {
        self.results.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl SpeechToText for ReplayTranscriber {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn transcribe(&self, audio: &Recording) -> Result<Vec<String>> {
        let mut results = self
            .results
            .lock()
            .map_err(|_| Error::backend("replay", "transcript queue poisoned"))?;
        let texts = results.pop_front().unwrap_or_default();
        debug!(frames = audio.len(), ?texts, "replaying transcript");
        Ok(texts)
    }
}
