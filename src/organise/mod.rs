//! The reorganisation engine
//!
//! [`Organiser`] groups the operations that move media into dated buckets
//! and keep the names inside a bucket consistent:
//! - [`Organiser::organise_by_date`] files a flat directory into buckets
//! - [`Organiser::organise_videos_and_rename_images`] normalises every bucket
//! - [`Organiser::rename_directory`] renames one bucket and its contents
//! - [`Organiser::file_count`] counts files for before/after verification
//!
//! Every operation runs synchronously and stops at the first error. Nothing
//! is rolled back; each step is safe to re-run against the partial result.

mod bucket;
mod date;
mod rename;

pub use bucket::NormaliseSummary;
pub use rename::RenameOutcome;

use crate::config::Config;
use crate::count;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::Dispatch;

/// Media organiser bound to a configuration and a log sink
#[derive(Debug, Clone)]
pub struct Organiser {
    config: Config,
    dispatch: Dispatch,
}

impl Organiser {
    /// Create an organiser that discards its log output
    pub fn new(config: Config) -> Self {
        Self::with_dispatch(config, Dispatch::none())
    }

    /// Create an organiser that logs to the given dispatcher
    pub fn with_dispatch(config: Config, dispatch: Dispatch) -> Self {
        Self { config, dispatch }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Recursively count non-hidden regular files under `root`
    pub fn file_count(&self, root: &Path) -> Result<usize> {
        self.scoped(|| count::file_count(root))
    }

    /// Run `f` with this organiser's dispatcher as the current default
    fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

/// Extension for a renamed image: jpg/jpeg become `.jpg`, anything else is
/// lower-cased
fn image_extension(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            ".jpg".to_string()
        }
        Some(ext) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

/// Extension exactly as found on disk
fn original_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Base name of a directory as text, for tokenizing
///
/// A name that is not valid UTF-8 cannot be a bucket name.
fn dir_name(path: &Path) -> Result<&str> {
    let Some(name) = path.file_name() else {
        return Ok("");
    };
    name.to_str().ok_or_else(|| Error::Format {
        name: name.to_string_lossy().into_owned(),
        expected: "a UTF-8 directory name",
    })
}
