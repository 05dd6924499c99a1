//! Per-bucket normalisation: video separation and sequential image names

use super::{Organiser, dir_name, image_extension, original_extension};
use crate::config::MediaKind;
use crate::error::{Error, Result};
use crate::fsutil;
use crate::name::BucketName;
use crate::sequence::{RenamePlan, sequence};
use std::fs;
use std::path::Path;
use tracing::{Level, debug, info, span};

/// Totals from one normalisation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormaliseSummary {
    /// Bucket directories visited
    pub buckets: usize,
    /// Images whose name changed
    pub images: usize,
    /// Videos moved into a videos subdirectory
    pub videos: usize,
}

impl Organiser {
    /// Normalise every directory directly inside `target_dir`
    ///
    /// For each bucket, videos are moved into the videos subdirectory first
    /// and named `<prefix>_<NNNNN><ext>` (extension case kept), then images
    /// are renamed in place to `<prefix>_<NNNNN>.jpg`. A bucket whose name is
    /// not exactly `YYYY MM Month DD` is an error, unless it holds no media
    /// to rename. Files directly inside `target_dir` are ignored.
    pub fn organise_videos_and_rename_images(&self, target_dir: &Path) -> Result<NormaliseSummary> {
        self.scoped(|| {
            let _span = span!(
                Level::INFO,
                "organise_videos_and_rename_images",
                target = %target_dir.display()
            )
            .entered();

            fsutil::ensure_dir(target_dir)?;

            let mut buckets = Vec::new();
            for entry in fs::read_dir(target_dir).map_err(Error::io("read directory", target_dir))? {
                let entry = entry.map_err(Error::io("read directory", target_dir))?;
                let file_type = entry.file_type().map_err(Error::io("stat", &entry.path()))?;
                if file_type.is_dir() {
                    buckets.push(entry.path());
                }
            }

            let mut summary = NormaliseSummary::default();
            for bucket in sequence(buckets) {
                let videos = self.separate_videos(&bucket)?;
                let images = self.rename_images(&bucket)?;
                summary.buckets += 1;
                summary.videos += videos;
                summary.images += images;
            }

            info!(
                buckets = summary.buckets,
                images = summary.images,
                videos = summary.videos,
                "Normalised buckets"
            );
            Ok(summary)
        })
    }

    /// Move loose videos into the videos subdirectory
    ///
    /// Videos already in the subdirectory keep their place at the front of
    /// the sequence; newly moved ones are numbered after them.
    fn separate_videos(&self, dir: &Path) -> Result<usize> {
        let loose = fsutil::list_media(dir, MediaKind::Video, &self.config)?;
        if loose.is_empty() {
            return Ok(0);
        }
        let moved = loose.len();

        let bucket = BucketName::tokenize_exact(dir_name(dir)?)?;
        let videos_dir = dir.join(&self.config.videos_dir);

        let mut ordered = if videos_dir.is_dir() {
            sequence(fsutil::list_media(&videos_dir, MediaKind::Video, &self.config)?)
        } else {
            Vec::new()
        };
        ordered.extend(sequence(loose));

        let plan = RenamePlan::numbered(ordered, &videos_dir, &bucket.file_prefix(), original_extension);
        plan.validate()?;

        fsutil::create_dir(&videos_dir)?;
        debug!(bucket = %bucket, count = moved, "Separating videos");
        plan.apply()?;
        Ok(moved)
    }

    /// Rename images in place, in sequence order
    fn rename_images(&self, dir: &Path) -> Result<usize> {
        let images = fsutil::list_media(dir, MediaKind::Image, &self.config)?;
        if images.is_empty() {
            return Ok(0);
        }

        let bucket = BucketName::tokenize_exact(dir_name(dir)?)?;
        let plan = RenamePlan::sequential(images, dir, &bucket.file_prefix(), image_extension);
        debug!(bucket = %bucket, count = plan.len(), "Renaming images");
        plan.apply()
    }
}
