//! Phrase resources and text matching helpers for plugins.

use std::fs;
use std::path::Path;

use crate::{Error, Result};

const EN_STANDARD_PHRASES: &str = include_str!("../data/standard_phrases/en.txt");

/// Parse a phrase list: one phrase per line, blank lines and `#` comments ignored.
pub fn parse_phrases(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Common conversational phrases for `language`.
///
/// An explicit `override_path` wins over the embedded resources. Without one, only the
/// languages shipped with the crate are known (`en`, including regional variants such as
/// `en-US`).
pub fn standard_phrases(language: &str, override_path: Option<&Path>) -> Result<Vec<String>> {
    if let Some(path) = override_path {
        let text = fs::read_to_string(path)
            .map_err(|err| Error::io("failed to read standard phrases", path, err))?;
        return Ok(parse_phrases(&text));
    }

    let base = language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match base.as_str() {
        "en" => Ok(parse_phrases(EN_STANDARD_PHRASES)),
        _ => Err(Error::config(format!(
            "no standard phrases for language '{language}'; set standard_phrases_path"
        ))),
    }
}

/// Split text into uppercase words, dropping punctuation other than apostrophes.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_uppercase)
}

/// Whether `text` contains `phrase` as whole words, ignoring case and punctuation.
///
/// `"Tell me a joke."` contains `"JOKE"` but `"jokester"` does not.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let needle: Vec<String> = words(phrase).collect();
    if needle.is_empty() {
        return false;
    }
    let hay: Vec<String> = words(text).collect();
    hay.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// Whether `text` contains any of `phrases` as whole words.
pub fn contains_any<S: AsRef<str>>(text: &str, phrases: &[S]) -> bool {
    phrases.iter().any(|p| contains_phrase(text, p.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_english_phrases_are_available() -> anyhow::Result<()> {
        let phrases = standard_phrases("en", None)?;
        assert!(phrases.contains(&"WHAT".to_owned()));
        assert!(phrases.iter().all(|p| p == &p.to_uppercase()));

        assert_eq!(standard_phrases("en-US", None)?, phrases);
        Ok(())
    }

    #[test]
    fn unknown_language_needs_an_explicit_file() -> anyhow::Result<()> {
        let err = standard_phrases("de", None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("de.txt");
        fs::write(&path, "# Deutsch\nHALLO\n\nJA\n")?;
        assert_eq!(standard_phrases("de", Some(path.as_path()))?, vec!["HALLO", "JA"]);
        Ok(())
    }

    #[test]
    fn words_are_uppercased_without_punctuation() {
        assert_eq!(
            words("What time is it?").collect::<Vec<_>>(),
            vec!["WHAT", "TIME", "IS", "IT"]
        );
        assert_eq!(words("'who's there'").collect::<Vec<_>>(), vec!["WHO'S", "THERE"]);
    }

    #[test]
    fn phrase_matching_uses_whole_words() {
        assert!(contains_phrase("Tell me a joke.", "JOKE"));
        assert!(contains_phrase("what's the MEANING of life?", "meaning of life"));
        assert!(!contains_phrase("he is a jokester", "JOKE"));
        assert!(!contains_phrase("meaning in life", "meaning of life"));
        assert!(!contains_phrase("anything", ""));
    }

    #[test]
    fn contains_any_checks_every_phrase() {
        assert!(contains_any("knock knock", &["JOKE", "KNOCK"]));
        assert!(!contains_any("hello there", &["JOKE", "KNOCK"]));
    }
}
