//! Date bucketing of a flat source directory

use super::Organiser;
use crate::error::{Error, Result};
use crate::fsutil;
use crate::name::BucketName;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tracing::{Level, debug, info, span};

impl Organiser {
    /// Move every file directly inside `source_dir` into
    /// `target_dir/<YYYY MM Month DD>/`, keeping its file name
    ///
    /// The bucket comes from the file's modification time in local time.
    /// Subdirectories of the source are left alone. Returns the number of
    /// files moved.
    pub fn organise_by_date(&self, source_dir: &Path, target_dir: &Path) -> Result<usize> {
        self.scoped(|| {
            let _span = span!(
                Level::INFO,
                "organise_by_date",
                source = %source_dir.display(),
                target = %target_dir.display()
            )
            .entered();

            fsutil::ensure_dir(source_dir)?;

            let mut moved = 0usize;
            for entry in fs::read_dir(source_dir).map_err(Error::io("read directory", source_dir))? {
                let entry = entry.map_err(Error::io("read directory", source_dir))?;
                let path = entry.path();

                let file_type = entry.file_type().map_err(Error::io("stat", &path))?;
                if file_type.is_dir() {
                    debug!(path = %path.display(), "Skipping subdirectory");
                    continue;
                }

                let modified = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .map_err(Error::io("stat", &path))?;
                let bucket = bucket_for(modified);

                let dest_dir = target_dir.join(bucket.dir_name());
                fsutil::create_dir(&dest_dir)?;

                let dest = dest_dir.join(entry.file_name());
                if fsutil::exists(&dest) {
                    return Err(Error::Conflict { path: dest });
                }

                debug!(from = %path.display(), to = %dest.display(), "Moving file");
                fsutil::rename(&path, &dest)?;
                moved += 1;
            }

            info!(moved, "Organised files by date");
            Ok(moved)
        })
    }
}

/// Bucket for a modification time, in local time
pub(super) fn bucket_for(modified: SystemTime) -> BucketName {
    let local: DateTime<Local> = modified.into();
    BucketName::from_date(local.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::organise::test_support::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_bucket_for() {
        let time = Local.with_ymd_and_hms(2023, 6, 15, 10, 30, 0).single().unwrap();
        let bucket = bucket_for(time.into());
        assert_eq!(bucket.dir_name(), "2023 06 June 15");
    }

    #[test]
    fn test_organise_by_date() {
        let tmp = tempdir().unwrap();
        let source = create_dir(tmp.path(), "source");
        let target = tmp.path().join("target");

        let file1 = create_file_with_date(&source, "image1.jpg", 2023, 6, 15);
        let file2 = create_file_with_date(&source, "image2.jpeg", 2023, 6, 15);

        let organiser = Organiser::new(Config::default());
        let moved = organiser.organise_by_date(&source, &target).unwrap();
        assert_eq!(moved, 2);

        let expected = target.join("2023 06 June 15");
        assert!(expected.join("image1.jpg").is_file());
        assert!(expected.join("image2.jpeg").is_file());
        assert!(!file1.exists());
        assert!(!file2.exists());
    }

    #[test]
    fn test_organise_by_date_multiple_dates() {
        let tmp = tempdir().unwrap();
        let source = create_dir(tmp.path(), "source");
        let target = tmp.path().join("target");

        create_file_with_date(&source, "june.jpg", 2023, 6, 15);
        create_file_with_date(&source, "july.mov", 2023, 7, 20);
        create_file_with_date(&source, "new_year.jpg", 2024, 1, 1);

        let organiser = Organiser::new(Config::default());
        organiser.organise_by_date(&source, &target).unwrap();

        assert!(target.join("2023 06 June 15").join("june.jpg").is_file());
        assert!(target.join("2023 07 July 20").join("july.mov").is_file());
        assert!(target.join("2024 01 January 01").join("new_year.jpg").is_file());
        assert!(file_names(&source).is_empty());
    }

    #[test]
    fn test_organise_by_date_skips_directories() {
        let tmp = tempdir().unwrap();
        let source = create_dir(tmp.path(), "source");
        let target = tmp.path().join("target");

        let sub_dir = create_dir(&source, "subdir");
        create_file_with_date(&sub_dir, "nested.jpg", 2023, 6, 15);
        create_file_with_date(&source, "image1.jpg", 2023, 6, 15);

        let organiser = Organiser::new(Config::default());
        assert_eq!(organiser.organise_by_date(&source, &target).unwrap(), 1);

        assert!(target.join("2023 06 June 15").join("image1.jpg").is_file());
        assert!(sub_dir.join("nested.jpg").is_file());
        assert_eq!(file_names(&target), vec!["2023 06 June 15"]);
    }

    #[test]
    fn test_organise_by_date_adds_to_existing_bucket() {
        let tmp = tempdir().unwrap();
        let source = create_dir(tmp.path(), "source");
        let target = create_dir(tmp.path(), "target");
        let bucket = create_dir(&target, "2023 06 June 15");
        create_file(&bucket, "earlier.jpg");

        create_file_with_date(&source, "later.jpg", 2023, 6, 15);

        let organiser = Organiser::new(Config::default());
        organiser.organise_by_date(&source, &target).unwrap();

        assert_eq!(file_names(&bucket), vec!["earlier.jpg", "later.jpg"]);
    }

    #[test]
    fn test_organise_by_date_never_overwrites() {
        let tmp = tempdir().unwrap();
        let source = create_dir(tmp.path(), "source");
        let target = create_dir(tmp.path(), "target");
        let bucket = create_dir(&target, "2023 06 June 15");
        create_file(&bucket, "same.jpg");

        let incoming = create_file_with_date(&source, "same.jpg", 2023, 6, 15);

        let organiser = Organiser::new(Config::default());
        let err = organiser.organise_by_date(&source, &target).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        assert!(incoming.is_file());
    }

    #[test]
    fn test_organise_by_date_nonexistent_source() {
        let tmp = tempdir().unwrap();
        let organiser = Organiser::new(Config::default());
        let err = organiser
            .organise_by_date(&tmp.path().join("missing"), &tmp.path().join("target"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
