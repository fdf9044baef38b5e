use crate::Result;
use crate::audio::Recording;

/// Pluggable speech-to-text engine.
///
/// Engines turn a frozen [`Recording`] into an ordered list of transcription hypotheses,
/// best first. An empty list means "nothing recognized" and is not an error.
///
/// The passive (keyword) engine is shared with background workers, so it must be
/// `Send + Sync`; the active engine is only used from the listening thread.
pub trait SpeechToText {
    /// Short engine name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Transcribe a complete recording.
    fn transcribe(&self, audio: &Recording) -> Result<Vec<String>>;
}

/// Pluggable text-to-speech engine.
///
/// Engines synthesize audio that the microphone then plays through its device.
pub trait TextToSpeech {
    fn name(&self) -> &'static str;

    /// Synthesize `text` into a playable buffer.
    fn say(&self, text: &str) -> Result<Recording>;
}

impl<T: SpeechToText + ?Sized> SpeechToText for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn transcribe(&self, audio: &Recording) -> Result<Vec<String>> {
        (**self).transcribe(audio)
    }
}

impl<T: SpeechToText + ?Sized> SpeechToText for std::sync::Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn transcribe(&self, audio: &Recording) -> Result<Vec<String>> {
        (**self).transcribe(audio)
    }
}
