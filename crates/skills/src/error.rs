use std::path::{Path, PathBuf};

use skillbox_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Walkdir(#[from] walkdir::Error),
    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    /// Cloning or opening a repository for exploration failed. This is the
    /// only failure the explorer lets escape.
    #[error("failed to explore repository {url}: {message}")]
    Exploration { url: String, message: String },
    #[error("scan root {path} is not readable: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to execute `{operation}`: {source}")]
    CommandExecution {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("`{operation}` failed: {stderr}")]
    CommandFailed {
        operation: &'static str,
        stderr: String,
    },
    #[error("source path not found: {path}")]
    SourceNotFound { path: PathBuf },
    #[error("source path is a symlink: {path}")]
    SymlinkedSource { path: PathBuf },
    #[error("target path is a directory, not a symlink: {path}")]
    LinkTargetIsDirectory { path: PathBuf },
    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn command_execution(operation: &'static str, source: std::io::Error) -> Self {
        Self::CommandExecution { operation, source }
    }

    #[must_use]
    pub fn command_failed(operation: &'static str, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            operation,
            stderr: stderr.into(),
        }
    }

    #[must_use]
    pub fn exploration(url: &str, cause: &dyn std::fmt::Display) -> Self {
        Self::Exploration {
            url: url.to_string(),
            message: cause.to_string(),
        }
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

skillbox_common::impl_context!();

/// Failures that are absorbed where they happen instead of propagating.
///
/// Everything else in this crate either returns [`Error`] or cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovered {
    /// A subdirectory could not be listed; it is treated as absent.
    ClassificationSkip,
    /// An indicator file exists but could not be read or parsed; the directory
    /// still counts as a skill, without a description.
    DescriptionExtraction,
}

impl Recovered {
    pub fn absorb(self, path: &Path, error: &dyn std::fmt::Display) {
        match self {
            Self::ClassificationSkip => {
                tracing::debug!(path = %path.display(), %error, "skipping unreadable directory");
            },
            Self::DescriptionExtraction => {
                tracing::debug!(path = %path.display(), %error, "indicator has no usable description");
            },
        }
    }
}
