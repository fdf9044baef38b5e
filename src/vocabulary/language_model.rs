use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tracing::{debug, warn};

use super::{Phonemizer, Vocabulary, vocabulary_path};
use crate::phrases::words;

pub const LANGUAGE_MODEL_FILE: &str = "languagemodel";
pub const DICTIONARY_FILE: &str = "dictionary";

const SENTENCE_START: &str = "<s>";
const SENTENCE_END: &str = "</s>";

// Absolute discount applied to every bigram; the freed mass backs off to unigrams.
const BIGRAM_DISCOUNT: f64 = 0.5;

/// A vocabulary made of an ARPA bigram language model and a pronunciation dictionary.
///
/// Both artifacts are required for the vocabulary to count as compiled.
pub struct LanguageModelVocabulary<P> {
    name: String,
    path: PathBuf,
    phonemizer: P,
}

impl<P: Phonemizer> LanguageModelVocabulary<P> {
    pub fn new(root: &Path, name: impl Into<String>, phonemizer: P) -> Self {
        let name = name.into();
        Self {
            path: vocabulary_path(root, &name),
            name,
            phonemizer,
        }
    }

    pub fn language_model_path(&self) -> PathBuf {
        self.path.join(LANGUAGE_MODEL_FILE)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.path.join(DICTIONARY_FILE)
    }

    fn render_dictionary(&self, phrases: &[String]) -> anyhow::Result<String> {
        let unique: BTreeSet<String> = phrases.iter().flat_map(|p| words(p)).collect();

        let mut out = String::new();
        let mut missing = Vec::new();
        for word in &unique {
            let prons = self.phonemizer.pronunciations(word);
            if prons.is_empty() {
                missing.push(word.as_str());
                continue;
            }
            for (idx, phones) in prons.iter().enumerate() {
                let phones = phones.join(" ");
                if idx == 0 {
                    writeln!(out, "{word}\t{phones}")?;
                } else {
                    writeln!(out, "{word}({})\t{phones}", idx + 1)?;
                }
            }
        }

        if !missing.is_empty() {
            warn!(vocabulary = %self.name, words = ?missing, "no pronunciation found, skipping");
        }
        if out.is_empty() {
            bail!("none of the {} words has a known pronunciation", unique.len());
        }
        Ok(out)
    }
}

impl<P: Phonemizer> Vocabulary for LanguageModelVocabulary<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn is_compiled(&self) -> bool {
        super::is_compiled(&self.path)
            && self.language_model_path().is_file()
            && self.dictionary_path().is_file()
    }

    fn compile_vocabulary(&self, phrases: &[String]) -> anyhow::Result<()> {
        let dictionary = self.render_dictionary(phrases)?;
        let model = ArpaModel::from_phrases(phrases);

        let lm_path = self.language_model_path();
        fs::write(&lm_path, model.to_string())
            .with_context(|| format!("failed to write language model '{}'", lm_path.display()))?;

        let dict_path = self.dictionary_path();
        fs::write(&dict_path, dictionary)
            .with_context(|| format!("failed to write dictionary '{}'", dict_path.display()))?;

        debug!(
            vocabulary = %self.name,
            unigrams = model.unigram_count(),
            bigrams = model.bigram_count(),
            "wrote language model"
        );
        Ok(())
    }
}

/// A bigram language model estimated from a phrase set, rendered in ARPA format.
///
/// Each phrase is one sentence, wrapped in `<s>` / `</s>`. Unigrams are maximum-likelihood
/// estimates; bigrams are discounted and back off to the unigram distribution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArpaModel {
    unigrams: BTreeMap<String, u64>,
    bigrams: BTreeMap<(String, String), u64>,
}

impl ArpaModel {
    pub fn from_phrases<S: AsRef<str>>(phrases: &[S]) -> Self {
        let mut model = Self::default();
        for phrase in phrases {
            let tokens: Vec<String> = std::iter::once(SENTENCE_START.to_owned())
                .chain(words(phrase.as_ref()))
                .chain(std::iter::once(SENTENCE_END.to_owned()))
                .collect();
            if tokens.len() == 2 {
                continue;
            }

            for token in &tokens {
                *model.unigrams.entry(token.clone()).or_default() += 1;
            }
            for pair in tokens.windows(2) {
                *model
                    .bigrams
                    .entry((pair[0].clone(), pair[1].clone()))
                    .or_default() += 1;
            }
        }
        model
    }

    pub fn unigram_count(&self) -> usize {
        self.unigrams.len()
    }

    pub fn bigram_count(&self) -> usize {
        self.bigrams.len()
    }

    fn has_successor(&self, word: &str) -> bool {
        self.bigrams.keys().any(|(first, _)| first == word)
    }
}

impl fmt::Display for ArpaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `<s>` is never predicted, so it is excluded from the unigram mass.
        let total: u64 = self
            .unigrams
            .iter()
            .filter(|(w, _)| w.as_str() != SENTENCE_START)
            .map(|(_, c)| c)
            .sum();
        let backoff = (1.0 - BIGRAM_DISCOUNT).log10();

        writeln!(f, "\\data\\")?;
        writeln!(f, "ngram 1={}", self.unigrams.len())?;
        writeln!(f, "ngram 2={}", self.bigrams.len())?;
        writeln!(f)?;

        writeln!(f, "\\1-grams:")?;
        for (word, count) in &self.unigrams {
            let prob = if word == SENTENCE_START || total == 0 {
                -99.0
            } else {
                (*count as f64 / total as f64).log10()
            };
            if self.has_successor(word) {
                writeln!(f, "{prob:.4} {word} {backoff:.4}")?;
            } else {
                writeln!(f, "{prob:.4} {word}")?;
            }
        }
        writeln!(f)?;

        writeln!(f, "\\2-grams:")?;
        for ((first, second), count) in &self.bigrams {
            let history = self.unigrams.get(first).copied().unwrap_or(1).max(1);
            let prob = (BIGRAM_DISCOUNT * *count as f64 / history as f64).log10();
            writeln!(f, "{prob:.4} {first} {second}")?;
        }
        writeln!(f)?;

        writeln!(f, "\\end\\")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::vocabulary::{CmuDictionary, REVISION_FILE};

    const DICT: &str = "JASPER  JH AE1 S P ER0\n\
        WHAT  W AH1 T\n\
        TIME  T AY1 M\n\
        IS  IH1 Z\n\
        IT  IH1 T\n";

    fn phrases(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn vocabulary(root: &Path) -> anyhow::Result<LanguageModelVocabulary<CmuDictionary>> {
        let dict = CmuDictionary::from_reader(Cursor::new(DICT))?;
        Ok(LanguageModelVocabulary::new(root, "default", dict))
    }

    #[test]
    fn arpa_counts_sentences_and_bigrams() {
        let model = ArpaModel::from_phrases(&["JASPER", "WHAT TIME IS IT", ""]);
        // <s> </s> JASPER WHAT TIME IS IT
        assert_eq!(model.unigram_count(), 7);
        // <s>-JASPER, JASPER-</s>, <s>-WHAT, WHAT-TIME, TIME-IS, IS-IT, IT-</s>
        assert_eq!(model.bigram_count(), 7);

        let text = model.to_string();
        assert!(text.starts_with("\\data\\\nngram 1=7\nngram 2=7\n"));
        assert!(text.contains("-99.0000 <s> -0.3010"));
        assert!(text.contains("-0.3010 WHAT TIME"));
        assert!(text.trim_end().ends_with("\\end\\"));
    }

    #[test]
    fn compile_writes_both_artifacts() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let vocab = vocabulary(dir.path())?;
        let words = phrases(&["JASPER", "WHAT TIME IS IT"]);

        vocab.compile(&words, false)?;

        assert!(vocab.is_compiled());
        assert!(vocab.matches_phrases(&words));
        let dict = fs::read_to_string(vocab.dictionary_path())?;
        assert!(dict.contains("JASPER\tJH AE S P ER\n"));
        let lm = fs::read_to_string(vocab.language_model_path())?;
        assert!(lm.contains("ngram 1=7"));
        Ok(())
    }

    #[test]
    fn sentinel_without_artifacts_is_recompiled() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let vocab = vocabulary(dir.path())?;
        let words = phrases(&["JASPER"]);

        vocab.compile(&words, false)?;
        fs::remove_file(vocab.language_model_path())?;

        assert!(vocab.path().join(REVISION_FILE).exists());
        assert!(!vocab.is_compiled());
        assert!(!vocab.matches_phrases(&words));

        vocab.compile(&words, false)?;
        assert!(vocab.is_compiled());
        Ok(())
    }

    #[test]
    fn unpronounceable_phrases_fail_and_leave_nothing_compiled() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let vocab = vocabulary(dir.path())?;

        let err = vocab.compile(&phrases(&["FLIBBERTIGIBBET"]), false).unwrap_err();

        assert!(matches!(err, crate::Error::Compile { .. }));
        assert!(!vocab.is_compiled());
        assert!(!vocab.path().join(REVISION_FILE).exists());
        Ok(())
    }

    #[test]
    fn unknown_words_are_skipped() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let vocab = vocabulary(dir.path())?;

        vocab.compile(&phrases(&["JASPER", "WEATHER"]), false)?;

        let dict = fs::read_to_string(vocab.dictionary_path())?;
        assert!(dict.contains("JASPER"));
        assert!(!dict.contains("WEATHER"));
        Ok(())
    }
}
