//! The listen → dispatch → speak loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::Result;
use crate::brain::Brain;
use crate::mic::{Cancellation, Mic};
use crate::opts::Opts;

/// Spoken when a command came back empty.
pub const PARDON: &str = "Pardon?";

/// Spoken when a plugin fails.
pub const APOLOGY: &str = "I'm sorry. I had some trouble with that operation. Please try again later.";

#[derive(Debug, Default)]
struct State {
    suspended: AtomicBool,
    stopped: AtomicBool,
    cancel: Option<Cancellation>,
}

/// Remote control for a running [`Conversation`], usable from any thread.
#[derive(Debug, Clone)]
pub struct ConversationHandle {
    state: Arc<State>,
}

impl ConversationHandle {
    /// Stop listening until [`resume`](Self::resume). A blocked `listen` is cancelled.
    pub fn suspend(&self) {
        info!("suspending conversation");
        self.state.suspended.store(true, Ordering::SeqCst);
        if let Some(cancel) = &self.state.cancel {
            cancel.cancel();
        }
    }

    pub fn resume(&self) {
        info!("resuming conversation");
        if let Some(cancel) = &self.state.cancel {
            if !self.is_stopped() {
                cancel.reset();
            }
        }
        self.state.suspended.store(false, Ordering::SeqCst);
    }

    /// End the loop after the current iteration. A blocked `listen` is cancelled.
    pub fn stop(&self) {
        info!("stopping conversation");
        self.state.stopped.store(true, Ordering::SeqCst);
        if let Some(cancel) = &self.state.cancel {
            cancel.cancel();
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.state.suspended.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.state.stopped.load(Ordering::SeqCst)
    }
}

/// Drives a [`Mic`] and a [`Brain`]: listen for a command, dispatch it, repeat.
pub struct Conversation<M: Mic> {
    mic: M,
    brain: Brain,
    handle: ConversationHandle,
    suspend_poll: Duration,
}

impl<M: Mic> Conversation<M> {
    pub fn new(mic: M, brain: Brain, opts: &Opts) -> Self {
        let state = State {
            cancel: mic.cancellation(),
            ..State::default()
        };
        Self {
            mic,
            brain,
            handle: ConversationHandle {
                state: Arc::new(state),
            },
            suspend_poll: opts.listen.suspend_poll(),
        }
    }

    pub fn handle(&self) -> ConversationHandle {
        self.handle.clone()
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn mic(&self) -> &M {
        &self.mic
    }

    pub fn mic_mut(&mut self) -> &mut M {
        &mut self.mic
    }

    pub fn into_mic(self) -> M {
        self.mic
    }

    /// Run until stopped or until the mic's input closes.
    ///
    /// Mic errors (device failures) end the loop and are returned; plugin errors never do.
    pub fn run(&mut self) -> Result<()> {
        info!(plugins = self.brain.plugins().len(), "starting conversation");

        while !self.handle.is_stopped() {
            if self.handle.is_suspended() {
                thread::sleep(self.suspend_poll);
                continue;
            }

            let Some(texts) = self.mic.listen()? else {
                info!("input closed, ending conversation");
                break;
            };

            if self.handle.is_stopped() {
                break;
            }
            if self.handle.is_suspended() {
                debug!(?texts, "dropping input heard while suspending");
                continue;
            }

            if texts.is_empty() {
                self.mic.say(PARDON)?;
                continue;
            }

            self.handle_input(&texts);
        }

        Ok(())
    }

    /// Dispatch one command to the first plugin that accepts it.
    ///
    /// Returns `true` when a plugin handled it successfully; `false` when nothing matched or
    /// the plugin failed (in which case an apology is spoken).
    pub fn handle_input<S: AsRef<str>>(&mut self, texts: &[S]) -> bool {
        let Some((plugin, text)) = self.brain.query(texts) else {
            debug!("no plugin for input");
            return false;
        };

        info!(plugin = plugin.name(), text, "handling input");
        match plugin.handle(text, &mut self.mic) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    plugin = plugin.name(),
                    text,
                    error = %format!("{err:#}"),
                    "plugin failed"
                );
                if let Err(err) = self.mic.say(APOLOGY) {
                    warn!(error = %err, "failed to speak apology");
                }
                false
            }
        }
    }
}
