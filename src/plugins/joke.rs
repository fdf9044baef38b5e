use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Context;
use tracing::debug;

use crate::mic::Mic;
use crate::phrases::contains_any;
use crate::plugin::Plugin;

const JOKES: &str = include_str!("../../data/jokes.txt");

/// A knock-knock joke: the name at the door and the punchline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnockKnock {
    pub setup: String,
    pub punchline: String,
}

/// Tells knock-knock jokes, waiting for the user's lines in between.
///
/// Jokes are told in order and wrap around.
#[derive(Debug)]
pub struct Joke {
    jokes: Vec<KnockKnock>,
    next: AtomicUsize,
    timeout: Duration,
}

impl Joke {
    /// The built-in joke list.
    pub fn new(timeout: Duration) -> Self {
        Self::with_jokes(parse_jokes(JOKES), timeout)
    }

    pub fn with_jokes(jokes: Vec<KnockKnock>, timeout: Duration) -> Self {
        Self {
            jokes,
            next: AtomicUsize::new(0),
            timeout,
        }
    }

    fn next_joke(&self) -> Option<&KnockKnock> {
        if self.jokes.is_empty() {
            return None;
        }
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        self.jokes.get(idx % self.jokes.len())
    }
}

impl Plugin for Joke {
    fn name(&self) -> &str {
        "joke"
    }

    fn phrases(&self) -> Vec<String> {
        ["JOKE", "KNOCK"].map(str::to_owned).to_vec()
    }

    fn is_valid(&self, text: &str) -> bool {
        contains_any(text, &["joke", "knock knock"])
    }

    fn handle(&self, _text: &str, mic: &mut dyn Mic) -> anyhow::Result<()> {
        let joke = self.next_joke().context("no jokes loaded")?;

        mic.say("Knock knock.")?;
        let reply = mic.active_listen(self.timeout)?;
        debug!(?reply, "joke: who's there");

        mic.say(&format!("{}.", capitalize(&joke.setup)))?;
        let reply = mic.active_listen(self.timeout)?;
        debug!(?reply, "joke: who?");

        mic.say(&format!("{}.", capitalize(&joke.punchline)))?;
        Ok(())
    }
}

/// Parse jokes: setup and punchline on consecutive lines, jokes separated by blank lines.
///
/// `#` lines are comments. Incomplete jokes are skipped.
pub fn parse_jokes(text: &str) -> Vec<KnockKnock> {
    let mut jokes = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    let mut flush = |lines: &mut Vec<&str>| {
        if let [setup, punchline, ..] = lines.as_slice() {
            jokes.push(KnockKnock {
                setup: (*setup).to_owned(),
                punchline: (*punchline).to_owned(),
            });
        }
        lines.clear();
    };

    for line in text.lines().map(str::trim) {
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            flush(&mut lines);
        } else {
            lines.push(line);
        }
    }
    flush(&mut lines);

    jokes
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
