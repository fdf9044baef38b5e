//! Built-in speech engines.
//!
//! The assistant only depends on the [`SpeechToText`](crate::backend::SpeechToText) and
//! [`TextToSpeech`](crate::backend::TextToSpeech) traits; these are the implementations
//! shipped with the crate.

/// External decoder process driven through temporary WAV files.
pub mod command;

/// `espeak` speech synthesis.
pub mod espeak;

/// Scripted transcripts, for tests and offline demos.
pub mod replay;

/// Local speech-to-text through whisper.cpp.
#[cfg(feature = "whisper")]
pub mod whisper;

pub use command::CommandTranscriber;
pub use espeak::EspeakSpeech;
pub use replay::ReplayTranscriber;
#[cfg(feature = "whisper")]
pub use whisper::WhisperTranscriber;
