//! Plugin registry and priority-ordered dispatch.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::Result;
use crate::opts::Opts;
use crate::phrases::standard_phrases;
use crate::plugin::Plugin;

/// Ordered plugin list plus the language's standard phrases.
pub struct Brain {
    plugins: Vec<Box<dyn Plugin>>,
    standard_phrases: Vec<String>,
}

impl Brain {
    /// An empty brain with an explicit standard phrase set.
    pub fn new(standard_phrases: Vec<String>) -> Self {
        Self {
            plugins: Vec::new(),
            standard_phrases,
        }
    }

    /// An empty brain using the standard phrases configured for `opts.language`.
    pub fn for_language(opts: &Opts) -> Result<Self> {
        let phrases = standard_phrases(&opts.language, opts.standard_phrases_path.as_deref())?;
        debug!(language = %opts.language, phrases = phrases.len(), "loaded standard phrases");
        Ok(Self::new(phrases))
    }

    /// Register a plugin, keeping the list sorted by descending priority.
    ///
    /// The sort is stable, so plugins with equal priority stay in registration order.
    pub fn add_plugin(&mut self, plugin: Box<dyn Plugin>) {
        debug!(plugin = plugin.name(), priority = plugin.priority(), "registering plugin");
        self.plugins.push(plugin);
        self.plugins.sort_by_key(|p| std::cmp::Reverse(p.priority()));
    }

    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.add_plugin(Box::new(plugin));
        self
    }

    /// Plugins in dispatch order.
    pub fn plugins(&self) -> impl ExactSizeIterator<Item = &dyn Plugin> + '_ {
        self.plugins.iter().map(|p| p.as_ref() as &dyn Plugin)
    }

    pub fn standard_phrases(&self) -> &[String] {
        &self.standard_phrases
    }

    /// Every phrase any plugin declares plus the standard phrases, deduplicated and sorted.
    pub fn all_phrases(&self) -> Vec<String> {
        self.plugins
            .iter()
            .flat_map(|p| p.phrases())
            .chain(self.standard_phrases.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The first plugin (in priority order) that accepts any of `texts`, with the text it
    /// accepted.
    ///
    /// Plugins are the outer loop: a higher-priority plugin matching a later hypothesis wins
    /// over a lower-priority plugin matching an earlier one.
    pub fn query<'a, 'b, S: AsRef<str>>(
        &'a self,
        texts: &'b [S],
    ) -> Option<(&'a dyn Plugin, &'b str)> {
        for plugin in &self.plugins {
            for text in texts {
                let text = text.as_ref();
                if plugin.is_valid(text) {
                    debug!(plugin = plugin.name(), text, "plugin accepted input");
                    return Some((plugin.as_ref() as &dyn Plugin, text));
                }
            }
        }

        info!(texts = texts.len(), "no plugin accepted input");
        None
    }
}
