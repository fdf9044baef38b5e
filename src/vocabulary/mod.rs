//! Compiled recognizer vocabularies with content-addressed revisions.
//!
//! A vocabulary directory holds a `revision` sentinel (the SHA-1 fingerprint of the phrase
//! set it was built from) next to engine-specific artifacts. Compilation is skipped when
//! the sentinel already matches the phrases, which avoids regenerating language models on
//! every start.
//!
//! Crash-safety contract:
//! - The sentinel is written *before* the engine artifacts are generated.
//! - If generation fails, the sentinel is removed before the error is returned.
//! - Specializations also require their artifacts in `is_compiled`, so a sentinel left
//!   behind by a hard crash (artifacts missing) is treated as "not compiled".

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use tracing::{debug, error, info, warn};

use crate::{Error, Result};

mod dictionary;
mod language_model;

pub use dictionary::{CmuDictionary, Phonemizer};
pub use language_model::{ArpaModel, DICTIONARY_FILE, LANGUAGE_MODEL_FILE, LanguageModelVocabulary};

/// Name of the sentinel file inside a vocabulary directory.
pub const REVISION_FILE: &str = "revision";

/// Deterministic, order-independent fingerprint of a phrase set.
///
/// Phrases are deduplicated, sorted lexically, joined with `\n` and hashed with SHA-1.
pub fn fingerprint<I, S>(phrases: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sorted: BTreeSet<String> = phrases
        .into_iter()
        .map(|p| p.as_ref().to_owned())
        .collect();
    let joined = sorted.into_iter().collect::<Vec<_>>().join("\n");

    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The revision stored in `dir`, if the sentinel exists and is readable.
pub fn compiled_revision(dir: &Path) -> Option<String> {
    let path = dir.join(REVISION_FILE);
    match fs::read_to_string(&path) {
        Ok(contents) => {
            let revision = contents.trim();
            (!revision.is_empty()).then(|| revision.to_owned())
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "no readable revision file");
            None
        }
    }
}

/// Whether `dir` has a readable revision sentinel.
pub fn is_compiled(dir: &Path) -> bool {
    compiled_revision(dir).is_some()
}

/// Whether `dir` is compiled from exactly `phrases`.
pub fn matches<S: AsRef<str>>(dir: &Path, phrases: &[S]) -> bool {
    compiled_revision(dir).is_some_and(|rev| rev == fingerprint(phrases))
}

/// Compile `phrases` into `dir` with `compile_fn`, unless `dir` already matches.
///
/// Returns the revision of the (now) compiled vocabulary. With `force`, `compile_fn` always
/// runs.
pub fn compile<S, F>(dir: &Path, phrases: &[S], force: bool, compile_fn: F) -> Result<String>
where
    S: AsRef<str>,
    F: FnOnce(&Path, &[S]) -> anyhow::Result<()>,
{
    run_compile(dir, phrases, force, matches(dir, phrases), compile_fn)
}

/// A named, on-disk vocabulary for one recognizer.
pub trait Vocabulary {
    fn name(&self) -> &str;

    /// The vocabulary directory.
    fn path(&self) -> &Path;

    /// Produce the engine artifacts for `phrases` inside `self.path()`.
    ///
    /// The directory exists and the revision sentinel is already written when this runs.
    fn compile_vocabulary(&self, phrases: &[String]) -> anyhow::Result<()>;

    /// Compiled means the sentinel is readable; engines add their own artifact checks.
    fn is_compiled(&self) -> bool {
        is_compiled(self.path())
    }

    fn compiled_revision(&self) -> Option<String> {
        compiled_revision(self.path())
    }

    fn matches_phrases(&self, phrases: &[String]) -> bool {
        self.is_compiled() && self.compiled_revision() == Some(fingerprint(phrases))
    }

    /// Compile unless already up to date (or when forced).
    fn compile(&self, phrases: &[String], force: bool) -> Result<String> {
        let up_to_date = self.matches_phrases(phrases);
        run_compile(self.path(), phrases, force, up_to_date, |_, phrases| {
            self.compile_vocabulary(phrases)
        })
    }
}

/// Directory for the vocabulary `name` under `root`.
pub fn vocabulary_path(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

/// A vocabulary with no engine artifacts; only the revision is tracked.
///
/// Useful for engines that don't need a compiled grammar but still want change detection.
#[derive(Debug, Clone)]
pub struct DummyVocabulary {
    name: String,
    path: PathBuf,
}

impl DummyVocabulary {
    pub fn new(root: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: vocabulary_path(root, &name),
            name,
        }
    }
}

impl Vocabulary for DummyVocabulary {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn compile_vocabulary(&self, _phrases: &[String]) -> anyhow::Result<()> {
        Ok(())
    }
}

fn run_compile<S, F>(
    dir: &Path,
    phrases: &[S],
    force: bool,
    up_to_date: bool,
    compile_fn: F,
) -> Result<String>
where
    S: AsRef<str>,
    F: FnOnce(&Path, &[S]) -> anyhow::Result<()>,
{
    let revision = fingerprint(phrases);

    if up_to_date && !force {
        debug!(path = %dir.display(), %revision, "vocabulary up to date");
        return Ok(revision);
    }

    if let Some(stale) = compiled_revision(dir) {
        if stale == revision && !force {
            warn!(path = %dir.display(), %revision, "revision present but artifacts incomplete, recompiling");
        } else {
            debug!(path = %dir.display(), %stale, %revision, force, "replacing compiled vocabulary");
        }
    }

    fs::create_dir_all(dir).map_err(|err| {
        error!(path = %dir.display(), error = %err, "failed to create vocabulary directory");
        Error::io("failed to create vocabulary directory", dir, err)
    })?;

    let revision_path = dir.join(REVISION_FILE);
    fs::write(&revision_path, &revision).map_err(|err| {
        error!(path = %revision_path.display(), error = %err, "failed to write revision file");
        Error::io("failed to write revision file", &revision_path, err)
    })?;

    info!(path = %dir.display(), %revision, phrases = phrases.len(), "compiling vocabulary");

    if let Err(err) = compile_fn(dir, phrases) {
        error!(path = %dir.display(), error = %format!("{err:#}"), "vocabulary compilation failed");
        if let Err(rm_err) = fs::remove_file(&revision_path) {
            if rm_err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %revision_path.display(), error = %rm_err, "failed to remove revision file");
            }
        }
        return Err(Error::Compile {
            path: dir.to_path_buf(),
            source: err.into(),
        });
    }

    Ok(revision)
}
