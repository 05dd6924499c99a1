//! Small filesystem helpers that attach context to I/O errors

use crate::config::{Config, MediaKind};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Permission bits for directories created by the organiser
#[cfg(unix)]
const DIR_MODE: u32 = 0o755;

/// Fail with [`Error::NotFound`] unless `path` is an existing directory
pub fn ensure_dir(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::io("stat", path)(e)),
    }
}

/// Create a directory and any missing parents (owner-writable, world-readable)
pub fn create_dir(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path).map_err(Error::io("create directory", path))
}

/// Rename a file or directory
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(Error::io("rename", from))
}

/// Whether anything (including a dangling symlink) exists at `path`
pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Hidden entries start with a dot
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// List the regular, non-hidden files directly inside `dir` whose extension
/// belongs to the given media kind
///
/// Order is unspecified; callers sequence the result.
pub fn list_media(dir: &Path, kind: MediaKind, config: &Config) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(Error::io("read directory", dir))? {
        let entry = entry.map_err(Error::io("read directory", dir))?;
        let file_type = entry
            .file_type()
            .map_err(Error::io("stat", &entry.path()))?;
        if !file_type.is_file() {
            continue;
        }

        let path = entry.path();
        let hidden = path
            .file_name()
            .is_none_or(|n| is_hidden(&n.to_string_lossy()));
        if hidden {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| config.media_kind(ext))
            == Some(kind);
        if matches {
            files.push(path);
        }
    }
    Ok(files)
}
