//! Recursive file counting for before/after verification

use crate::error::Result;
use crate::fsutil;
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Count regular files under `root`, skipping hidden files and never
/// descending into hidden directories
///
/// The root itself is always walked, even if its own name starts with a dot.
pub fn file_count(root: &Path) -> Result<usize> {
    fsutil::ensure_dir(root)?;

    let mut count = 0usize;
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        if entry?.file_type().is_file() {
            count += 1;
        }
    }

    debug!(root = %root.display(), count, "Counted files");
    Ok(count)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(fsutil::is_hidden)
}
