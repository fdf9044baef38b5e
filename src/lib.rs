//! `jasper`: a voice-assistant client with wake-word listening, skill dispatch and spoken replies.
//!
//! This crate provides:
//! - Activity detection (noise-floor tracking, keyword spotting, command recording)
//! - A priority-ordered plugin registry and the conversation loop around it
//! - Content-addressed caching of compiled recognizer vocabularies
//! - Pluggable speech engines behind narrow traits
//!
//! Speech engines and audio devices are external collaborators; the crate ships a few
//! engine implementations under [`backends`] and a line-oriented [`mic::TextMic`] for
//! running without audio hardware.

// High-level API (most consumers should start here).
pub mod brain;
pub mod conversation;
pub mod opts;
pub mod plugin;

// Built-in skills and phrase resources.
pub mod phrases;
pub mod plugins;

// Audio model and activity detection.
pub mod audio;
pub mod keyword;
pub mod mic;
pub mod recorder;
pub mod signal;
pub mod wav;

// Speech engine interfaces and implementations.
pub mod backend;
pub mod backends;

// Recognizer vocabulary compilation.
pub mod vocabulary;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use brain::Brain;
pub use conversation::{Conversation, ConversationHandle};
pub use error::{Error, Result};
pub use mic::Mic;
pub use opts::{ListenOpts, Opts};
pub use plugin::Plugin;
