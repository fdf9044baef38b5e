use std::sync::atomic::{AtomicUsize, Ordering};

use crate::mic::Mic;
use crate::plugin::Plugin;

const MESSAGES: [&str; 4] = [
    "I'm sorry, could you repeat that?",
    "My apologies, could you try saying that again?",
    "Say that again?",
    "I beg your pardon?",
];

/// Catch-all fallback: accepts anything and asks the user to repeat.
///
/// Registered with the lowest possible priority so every other plugin is asked first.
#[derive(Debug, Default)]
pub struct Unclear {
    next: AtomicUsize,
}

impl Unclear {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_message(&self) -> &'static str {
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        MESSAGES[idx % MESSAGES.len()]
    }
}

impl Plugin for Unclear {
    fn name(&self) -> &str {
        "unclear"
    }

    fn phrases(&self) -> Vec<String> {
        Vec::new()
    }

    fn priority(&self) -> i32 {
        i32::MIN
    }

    fn is_valid(&self, _text: &str) -> bool {
        true
    }

    fn handle(&self, _text: &str, mic: &mut dyn Mic) -> anyhow::Result<()> {
        mic.say(self.next_message())?;
        Ok(())
    }
}
