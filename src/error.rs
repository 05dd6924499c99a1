//! Error types for the media organiser

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for organiser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media organiser
#[derive(Error, Debug)]
pub enum Error {
    #[error("Directory does not exist or is not a directory: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Directory name does not match expected format ({expected}): {name}")]
    Format { name: String, expected: &'static str },

    #[error("Target already exists: {}", path.display())]
    Conflict { path: PathBuf },

    #[error("Failed to {op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl Error {
    /// Build a closure that wraps an [`std::io::Error`] with the failed
    /// operation and the path it was applied to.
    pub(crate) fn io(op: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Error::Io { op, path, source }
    }
}
