use std::sync::atomic::{AtomicUsize, Ordering};

use crate::mic::Mic;
use crate::phrases::contains_phrase;
use crate::plugin::Plugin;

const ANSWERS: [&str; 3] = [
    "It's forty two.",
    "It's forty two. How many times do I have to tell you?",
    "Nobody knows for sure, but forty two is a popular guess.",
];

/// Answers questions about the meaning of life.
#[derive(Debug, Default)]
pub struct Life {
    next: AtomicUsize,
}

impl Life {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Plugin for Life {
    fn name(&self) -> &str {
        "life"
    }

    fn phrases(&self) -> Vec<String> {
        ["MEANING", "OF", "LIFE"].map(str::to_owned).to_vec()
    }

    fn is_valid(&self, text: &str) -> bool {
        contains_phrase(text, "meaning of life")
    }

    fn handle(&self, _text: &str, mic: &mut dyn Mic) -> anyhow::Result<()> {
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        mic.say(ANSWERS[idx % ANSWERS.len()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_whole_question_only() {
        let plugin = Life::new();
        assert!(plugin.is_valid("What is the meaning of life?"));
        assert!(!plugin.is_valid("life is good"));
        assert!(!plugin.is_valid("meaning"));
    }
}
