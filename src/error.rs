use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Jasper's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Jasper's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs. Plugin handlers and vocabulary compile functions
/// do return `anyhow::Result`, and those errors are folded in here at the crate boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("audio device failure: {0}")]
    Device(String),

    #[error("{context}: '{}'", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compile vocabulary at '{}'", path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("{engine} failed: {message}")]
    Backend {
        engine: &'static str,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn device(message: impl Into<String>) -> Self {
        Self::Device(message.into())
    }

    pub(crate) fn backend(engine: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            engine,
            message: message.into(),
        }
    }

    pub(crate) fn io(context: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyhow_errors_keep_their_context_chain() {
        let err = anyhow::anyhow!("root cause").context("outer");
        let err = Error::from(err);
        assert_eq!(err.to_string(), "outer: root cause");
    }

    #[test]
    fn io_errors_name_the_offending_path() {
        let err = Error::io(
            "failed to write revision file",
            Path::new("/tmp/vocab/revision"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            err.to_string(),
            "failed to write revision file: '/tmp/vocab/revision'"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn compile_errors_preserve_the_original_error() {
        let original: Box<dyn StdError + Send + Sync> = anyhow::anyhow!("lm tool crashed").into();
        let err = Error::Compile {
            path: PathBuf::from("vocab/default"),
            source: original,
        };
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "lm tool crashed");
    }
}
