//! Renaming a bucket together with the files it contains

use super::{Organiser, dir_name, image_extension, original_extension};
use crate::config::MediaKind;
use crate::error::{Error, Result};
use crate::fsutil;
use crate::name::BucketName;
use crate::sequence::RenamePlan;
use std::path::{Component, Path, PathBuf};
use tracing::{Level, debug, info, span};

/// Result of renaming a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    /// Absolute path of the bucket after the rename
    pub path: PathBuf,
    /// Images whose name changed
    pub images: usize,
    /// Videos whose name changed
    pub videos: usize,
}

impl Organiser {
    /// Rename a bucket to `<date> <new_name>` and re-stamp every image and
    /// video inside it with the matching prefix
    ///
    /// The date is taken from the first four tokens of the current name; any
    /// old free text is dropped. An empty `new_name` leaves only the date.
    /// Files are renamed while the directory is still at its old location,
    /// and the directory itself is renamed last.
    pub fn rename_directory(&self, directory: &Path, new_name: &str) -> Result<RenameOutcome> {
        self.scoped(|| {
            let _span = span!(
                Level::INFO,
                "rename_directory",
                directory = %directory.display(),
                new_name
            )
            .entered();

            let abs_dir = clean_absolute(directory)?;
            fsutil::ensure_dir(&abs_dir)?;

            if new_name.contains('/') || new_name.contains(std::path::MAIN_SEPARATOR) {
                return Err(Error::Format {
                    name: new_name.to_string(),
                    expected: "a name without path separators",
                });
            }

            let bucket = BucketName::tokenize(dir_name(&abs_dir)?)?;
            let renamed = bucket.with_suffix(new_name);

            let parent = abs_dir.parent().unwrap_or(Path::new("/"));
            let new_path = parent.join(renamed.dir_name());

            debug!(
                original = %directory.display(),
                absolute = %abs_dir.display(),
                old_suffix = bucket.suffix().unwrap_or(""),
                new_name = %renamed,
                new_path = %new_path.display(),
                "Rename paths"
            );

            let move_dir = abs_dir != new_path;
            if !move_dir {
                info!("Directory name unchanged, updating file names only");
            } else if fsutil::exists(&new_path) {
                return Err(Error::Conflict { path: new_path });
            }

            let prefix = renamed.file_prefix();

            let images = fsutil::list_media(&abs_dir, MediaKind::Image, &self.config)?;
            let image_plan = RenamePlan::sequential(images, &abs_dir, &prefix, image_extension);

            let videos_dir = abs_dir.join(&self.config.videos_dir);
            let video_plan = if videos_dir.is_dir() {
                let videos = fsutil::list_media(&videos_dir, MediaKind::Video, &self.config)?;
                RenamePlan::sequential(videos, &videos_dir, &prefix, original_extension)
            } else {
                RenamePlan::default()
            };

            image_plan.validate()?;
            video_plan.validate()?;

            if !image_plan.is_empty() {
                info!(count = image_plan.len(), pattern = %prefix, "Renaming images");
            }
            let images = image_plan.apply()?;

            if !video_plan.is_empty() {
                info!(count = video_plan.len(), pattern = %prefix, "Renaming videos");
            }
            let videos = video_plan.apply()?;

            if move_dir {
                info!(from = %abs_dir.display(), to = %new_path.display(), "Renaming directory");
                fsutil::rename(&abs_dir, &new_path)?;
            }

            Ok(RenameOutcome {
                path: new_path,
                images,
                videos,
            })
        })
    }
}

/// Make `path` absolute and resolve `.` and `..` lexically, without
/// following symlinks
fn clean_absolute(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(Error::io("resolve", path))?;

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    Ok(cleaned)
}
