use std::io::{BufRead, Write};
use std::time::Duration;

use tracing::debug;

use crate::Result;

use super::Mic;

/// A microphone that reads utterances as lines of text and writes replies as lines.
///
/// Two flavors:
/// - interactive: prompts before each read, blank lines are "nothing heard"
/// - batch: replays a file non-interactively, skipping blank and `#` comment lines
///
/// There is no wake word in text mode; every line is a command.
pub struct TextMic<R, W> {
    reader: R,
    writer: W,
    speaker: String,
    interactive: bool,
}

impl<R: BufRead, W: Write> TextMic<R, W> {
    /// Interactive text mode (e.g. stdin/stdout).
    pub fn new(reader: R, writer: W, speaker: impl Into<String>) -> Self {
        Self {
            reader,
            writer,
            speaker: speaker.into(),
            interactive: true,
        }
    }

    /// Batch replay of a file of utterances, one per line.
    pub fn batch(reader: R, writer: W, speaker: impl Into<String>) -> Self {
        Self {
            interactive: false,
            ..Self::new(reader, writer, speaker)
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_utterance(&mut self) -> Result<Option<String>> {
        if self.interactive {
            write!(self.writer, "YOU: ")?;
            self.writer.flush()?;
        }

        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let text = line.trim();
            if !self.interactive && (text.is_empty() || text.starts_with('#')) {
                continue;
            }

            debug!(text, "heard");
            return Ok(Some(text.to_owned()));
        }
    }
}

impl<R: BufRead, W: Write> Mic for TextMic<R, W> {
    fn listen(&mut self) -> Result<Option<Vec<String>>> {
        Ok(self.read_utterance()?.map(|text| {
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text]
            }
        }))
    }

    fn active_listen(&mut self, _timeout: Duration) -> Result<Vec<String>> {
        Ok(self.read_utterance()?.into_iter().filter(|t| !t.is_empty()).collect())
    }

    fn say(&mut self, phrase: &str) -> Result<()> {
        writeln!(self.writer, "{}: {}", self.speaker, phrase)?;
        self.writer.flush()?;
        Ok(())
    }
}
