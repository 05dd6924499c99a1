//! Configuration types for the media organiser

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of media file, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still images, renamed in place inside a bucket
    Image,
    /// Videos, moved into the bucket's videos subdirectory
    Video,
}

/// Configuration for the media organiser
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extensions treated as images (case-insensitive, without leading dot)
    pub image_extensions: Vec<String>,

    /// Extensions treated as videos (case-insensitive, without leading dot)
    pub video_extensions: Vec<String>,

    /// Name of the subdirectory that holds a bucket's videos
    pub videos_dir: String,

    /// Compare file counts before and after `organise`
    pub verify_file_count: bool,

    /// Directory for log files (no log file when unset)
    pub log_dir: Option<PathBuf>,

    /// Verbose output
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_extensions: vec!["jpg".into(), "jpeg".into()],
            video_extensions: vec!["mov".into()],
            videos_dir: "videos".into(),
            verify_file_count: true,
            log_dir: None,
            verbose: false,
        }
    }
}

impl Config {
    /// Check if a file extension is a configured image format
    pub fn is_image(&self, ext: &str) -> bool {
        contains_extension(&self.image_extensions, ext)
    }

    /// Check if a file extension is a configured video format
    pub fn is_video(&self, ext: &str) -> bool {
        contains_extension(&self.video_extensions, ext)
    }

    /// Get the media kind for a given extension
    ///
    /// Video wins if an extension is listed in both sets.
    pub fn media_kind(&self, ext: &str) -> Option<MediaKind> {
        if self.is_video(ext) {
            Some(MediaKind::Video)
        } else if self.is_image(ext) {
            Some(MediaKind::Image)
        } else {
            None
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Pics Configuration File
# This file uses TOML format (https://toml.io)

# Extensions treated as images, matched case-insensitively.
# Images are renamed in place to <prefix>_00001.<ext>; jpg and jpeg
# always become ".jpg", any other extension is lower-cased.
image_extensions = ["jpg", "jpeg"]

# Extensions treated as videos, matched case-insensitively.
# Videos are moved into the videos subdirectory and keep their
# extension exactly as found on disk.
video_extensions = ["mov"]

# Name of the per-bucket video subdirectory
videos_dir = "videos"

# Count files before and after `organise` and fail on a mismatch
verify_file_count = true

# Write a timestamped log file into this directory (optional)
# log_dir = "/var/log/pics"

# Verbose output - show every individual rename
verbose = false
"#
        .to_string()
    }
}

fn contains_extension(set: &[String], ext: &str) -> bool {
    let ext = ext.trim_start_matches('.');
    set.iter()
        .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}
