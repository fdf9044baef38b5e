use std::ffi::OsString;
use std::process::Command;

use tracing::{debug, warn};

use crate::audio::Recording;
use crate::backend::SpeechToText;
use crate::wav::write_temp_wav;
use crate::{Error, Result};

/// Placeholder replaced by the path of the recording in the argument list.
pub const WAV_PLACEHOLDER: &str = "{wav}";

/// Runs an external decoder on each recording.
///
/// The recording is written to a temporary WAV file whose path is substituted for
/// [`WAV_PLACEHOLDER`] in the arguments (or appended when no argument contains it). Every
/// non-empty line on the decoder's stdout is one hypothesis, best first.
#[derive(Debug, Clone)]
pub struct CommandTranscriber {
    program: String,
    args: Vec<String>,
}

impl CommandTranscriber {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a whitespace-separated command line, e.g. `"decoder --best {wav}"`.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::config("transcriber command is empty"))?;
        Ok(Self::new(program, parts))
    }

    fn args_for(&self, wav: &std::path::Path) -> Vec<OsString> {
        let mut substituted = false;
        let mut args: Vec<OsString> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(WAV_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(WAV_PLACEHOLDER, &wav.to_string_lossy()).into()
                } else {
                    arg.into()
                }
            })
            .collect();
        if !substituted {
            args.push(wav.as_os_str().to_owned());
        }
        args
    }
}

impl SpeechToText for CommandTranscriber {
    fn name(&self) -> &'static str {
        "command"
    }

    fn transcribe(&self, audio: &Recording) -> Result<Vec<String>> {
        let wav = write_temp_wav(audio)?;
        let args = self.args_for(wav.path());

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|err| Error::backend("command", format!("failed to run '{}': {err}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(program = %self.program, status = %output.status, "decoder failed");
            return Err(Error::backend(
                "command",
                format!("'{}' exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        let texts: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        debug!(program = %self.program, ?texts, "decoder finished");
        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::audio::AudioFormat;

    #[test]
    fn wav_path_is_substituted_or_appended() {
        let wav = Path::new("/tmp/jasper-1.wav");

        let placeholder = CommandTranscriber::new("decoder", ["-i", "{wav}", "--best"]);
        assert_eq!(
            placeholder.args_for(wav),
            vec![OsString::from("-i"), "/tmp/jasper-1.wav".into(), "--best".into()]
        );

        let appended = CommandTranscriber::new("decoder", ["--best"]);
        assert_eq!(
            appended.args_for(wav),
            vec![OsString::from("--best"), "/tmp/jasper-1.wav".into()]
        );
    }

    #[test]
    fn empty_command_line_is_rejected() {
        assert!(matches!(
            CommandTranscriber::from_command_line("   "),
            Err(Error::Config(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn stdout_lines_are_hypotheses() -> anyhow::Result<()> {
        let stt = CommandTranscriber::new("sh", ["-c", "printf 'what time\\n\\nwhat is time\\n'", "decoder"]);
        let audio = Recording::tone(AudioFormat::default(), 440.0, std::time::Duration::from_millis(50), 0.2);

        assert_eq!(stt.transcribe(&audio)?, vec!["what time", "what is time"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn failing_decoder_is_a_backend_error() {
        let stt = CommandTranscriber::new("sh", ["-c", "echo boom >&2; exit 3", "decoder"]);
        let err = stt
            .transcribe(&Recording::empty(AudioFormat::default()))
            .unwrap_err();
        assert!(matches!(err, Error::Backend { engine: "command", .. }));
        assert!(err.to_string().contains("boom"));
    }
}
