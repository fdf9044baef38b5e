//! Microphone abstractions used by the conversation loop and by plugins.
//!
//! A `Mic` bundles "hear something" and "say something". The audio implementation wires a
//! device, keyword detection, command recording and the speech engines together; the text
//! implementation reads utterances from a line-oriented stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::Result;

mod audio;
mod text;

pub use audio::AudioMic;
pub use text::TextMic;

/// Listen/speak interface handed to the conversation loop and to plugin handlers.
pub trait Mic {
    /// Wait for the wake word, then record and transcribe one command.
    ///
    /// Returns:
    /// - `Ok(Some(texts))` with the command's hypotheses (possibly empty when nothing was
    ///   understood or the wait was cancelled)
    /// - `Ok(None)` when the input source is closed for good
    fn listen(&mut self) -> Result<Option<Vec<String>>>;

    /// Record and transcribe one command without waiting for the wake word.
    ///
    /// Plugins use this for follow-up questions.
    fn active_listen(&mut self, timeout: Duration) -> Result<Vec<String>>;

    /// Speak `phrase` and block until playback finishes.
    fn say(&mut self, phrase: &str) -> Result<()>;

    /// Flag this mic polls while blocked on input, if any.
    fn cancellation(&self) -> Option<Cancellation> {
        None
    }
}

impl<M: Mic + ?Sized> Mic for &mut M {
    fn listen(&mut self) -> Result<Option<Vec<String>>> {
        (**self).listen()
    }

    fn active_listen(&mut self, timeout: Duration) -> Result<Vec<String>> {
        (**self).active_listen(timeout)
    }

    fn say(&mut self, phrase: &str) -> Result<()> {
        (**self).say(phrase)
    }

    fn cancellation(&self) -> Option<Cancellation> {
        (**self).cancellation()
    }
}

/// Cooperative cancellation flag, checked once per frame by blocking listeners.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
