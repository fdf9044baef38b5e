use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

/// Source of pronunciations for dictionary generation.
pub trait Phonemizer {
    /// All known pronunciations of `word` (uppercase), each a sequence of phones.
    ///
    /// An empty result means the word is unknown.
    fn pronunciations(&self, word: &str) -> Vec<Vec<String>>;
}

impl<P: Phonemizer + ?Sized> Phonemizer for &P {
    fn pronunciations(&self, word: &str) -> Vec<Vec<String>> {
        (**self).pronunciations(word)
    }
}

impl<P: Phonemizer + ?Sized> Phonemizer for Box<P> {
    fn pronunciations(&self, word: &str) -> Vec<Vec<String>> {
        (**self).pronunciations(word)
    }
}

/// An in-memory CMU pronouncing dictionary.
///
/// Accepts the plain `cmudict` text format:
///
/// ```text
/// ;;; comment
/// JASPER  JH AE1 S P ER0
/// READ  R EH1 D
/// READ(2)  R IY1 D
/// ```
///
/// Stress markers are stripped from the phones, matching the phone set used by the
/// English acoustic models.
#[derive(Debug, Clone, Default)]
pub struct CmuDictionary {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl CmuDictionary {
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut entries: HashMap<String, Vec<Vec<String>>> = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let phones: Vec<String> = parts.map(strip_stress).collect();
            if phones.is_empty() {
                continue;
            }

            let word = match word.find('(') {
                Some(idx) if word.ends_with(')') => &word[..idx],
                _ => word,
            };
            entries.entry(word.to_uppercase()).or_default().push(phones);
        }

        debug!(words = entries.len(), "loaded pronouncing dictionary");
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|err| Error::io("failed to open dictionary", path, err))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Phonemizer for CmuDictionary {
    fn pronunciations(&self, word: &str) -> Vec<Vec<String>> {
        self.entries
            .get(&word.to_uppercase())
            .cloned()
            .unwrap_or_default()
    }
}

fn strip_stress(phone: &str) -> String {
    phone.trim_end_matches(|c: char| c.is_ascii_digit()).to_owned()
}
