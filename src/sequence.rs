//! Sequential naming of a set of files
//!
//! Files are sorted by their full path (byte-wise, case-sensitive) and given
//! a dense, 1-based, five digit sequence number. Numbers are recomputed on
//! every run and never persisted.
//!
//! A [`RenamePlan`] is checked as a whole before the first file is touched:
//! destinations must be unique and must not clobber files outside the plan.
//! When some destinations are themselves sources of the same plan (a bucket
//! that was only partly renamed before), files are first moved to hidden
//! staging names so that no rename ever lands on a file still waiting to be
//! renamed.

use crate::error::{Error, Result};
use crate::fsutil;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sort paths into their sequence order
pub fn sequence(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    paths
}

/// File name for the file at `index` (0-based) of a sequence
///
/// `extension` includes its leading dot, or is empty.
pub fn sequenced_name(prefix: &str, index: usize, extension: &str) -> String {
    format!("{}_{:05}{}", prefix, index + 1, extension)
}

/// A single planned rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// An ordered set of renames applied as one unit
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    steps: Vec<Rename>,
}

impl RenamePlan {
    /// Plan sequential names for `files` inside `dest_dir`
    ///
    /// `extension` maps each source path to the extension (with dot) its
    /// new name should carry.
    pub fn sequential<F>(files: Vec<PathBuf>, dest_dir: &Path, prefix: &str, extension: F) -> Self
    where
        F: Fn(&Path) -> String,
    {
        Self::numbered(sequence(files), dest_dir, prefix, extension)
    }

    /// Plan names for files that are already in their final order
    pub fn numbered<F>(ordered: Vec<PathBuf>, dest_dir: &Path, prefix: &str, extension: F) -> Self
    where
        F: Fn(&Path) -> String,
    {
        let steps = ordered
            .into_iter()
            .enumerate()
            .map(|(index, from)| {
                let to = dest_dir.join(sequenced_name(prefix, index, &extension(&from)));
                Rename { from, to }
            })
            .collect();
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check every destination before anything is renamed
    pub fn validate(&self) -> Result<()> {
        let sources: HashSet<&Path> = self.steps.iter().map(|s| s.from.as_path()).collect();
        let mut destinations = HashSet::with_capacity(self.steps.len());

        for step in &self.steps {
            if !destinations.insert(step.to.as_path()) {
                return Err(Error::Conflict {
                    path: step.to.clone(),
                });
            }
            if !sources.contains(step.to.as_path()) && fsutil::exists(&step.to) {
                return Err(Error::Conflict {
                    path: step.to.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate, then perform the renames
    ///
    /// Returns the number of files whose name actually changed. A failure
    /// part-way leaves earlier renames in place.
    pub fn apply(&self) -> Result<usize> {
        self.validate()?;

        let pending: Vec<&Rename> = self.steps.iter().filter(|s| s.from != s.to).collect();
        let sources: HashSet<&Path> = pending.iter().map(|s| s.from.as_path()).collect();
        let overlapping = pending.iter().any(|s| sources.contains(s.to.as_path()));

        if !overlapping {
            for step in &pending {
                debug!(from = %step.from.display(), to = %step.to.display(), "Renaming file");
                fsutil::rename(&step.from, &step.to)?;
            }
            return Ok(pending.len());
        }

        debug!(
            count = pending.len(),
            "Destinations overlap sources, renaming through staging names"
        );

        let mut staged = Vec::with_capacity(pending.len());
        for (index, step) in pending.iter().enumerate() {
            let staging = staging_path(&step.from, index)?;
            fsutil::rename(&step.from, &staging)?;
            staged.push((staging, *step));
        }
        for (staging, step) in staged {
            debug!(from = %step.from.display(), to = %step.to.display(), "Renaming file");
            fsutil::rename(&staging, &step.to)?;
        }

        Ok(pending.len())
    }
}

/// Hidden sibling name used while a plan is half applied
fn staging_path(path: &Path, index: usize) -> Result<PathBuf> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = path.with_file_name(format!(".pics-staging-{:05}-{}", index, name));
    if fsutil::exists(&staging) {
        return Err(Error::Conflict { path: staging });
    }
    Ok(staging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn keep_extension(path: &Path) -> String {
        path.extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    #[test]
    fn test_sequence_is_case_sensitive_lexicographic() {
        let sorted = sequence(vec![
            PathBuf::from("/b/img.jpg"),
            PathBuf::from("/b/IMG.jpg"),
            PathBuf::from("/b/2.jpg"),
            PathBuf::from("/b/10.jpg"),
        ]);
        assert_eq!(
            sorted,
            vec![
                PathBuf::from("/b/10.jpg"),
                PathBuf::from("/b/2.jpg"),
                PathBuf::from("/b/IMG.jpg"),
                PathBuf::from("/b/img.jpg"),
            ]
        );
    }

    #[test]
    fn test_sequenced_name() {
        assert_eq!(sequenced_name("2023_06_June_15", 0, ".jpg"), "2023_06_June_15_00001.jpg");
        assert_eq!(sequenced_name("p", 41, ".MOV"), "p_00042.MOV");
        assert_eq!(sequenced_name("p", 99_999, ""), "p_100000");
    }

    #[test]
    fn test_plan_is_dense_and_ordered() {
        let dir = Path::new("/bucket");
        let plan = RenamePlan::sequential(
            vec![dir.join("c.jpg"), dir.join("a.jpg"), dir.join("b.jpg")],
            dir,
            "x",
            keep_extension,
        );

        let pairs: Vec<(&str, &str)> = plan
            .steps
            .iter()
            .map(|s| {
                (
                    s.from.file_name().unwrap().to_str().unwrap(),
                    s.to.file_name().unwrap().to_str().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a.jpg", "x_00001.jpg"),
                ("b.jpg", "x_00002.jpg"),
                ("c.jpg", "x_00003.jpg"),
            ]
        );
    }

    #[test]
    fn test_apply_renames_files() {
        let dir = tempdir().unwrap();
        let a = touch(dir.path(), "a.jpg", "a");
        let b = touch(dir.path(), "b.jpg", "b");

        let plan = RenamePlan::sequential(vec![b, a], dir.path(), "day", keep_extension);
        assert_eq!(plan.apply().unwrap(), 2);

        assert_eq!(fs::read_to_string(dir.path().join("day_00001.jpg")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dir.path().join("day_00002.jpg")).unwrap(), "b");
        assert!(!dir.path().join("a.jpg").exists());
    }

    #[test]
    fn test_apply_rejects_foreign_destination() {
        let dir = tempdir().unwrap();
        let a = touch(dir.path(), "a.jpg", "a");
        touch(dir.path(), "day_00001.jpg", "other");

        // The existing file is not part of the plan, so nothing may move
        let plan = RenamePlan::sequential(vec![a], dir.path(), "day", keep_extension);
        let err = plan.apply().unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        assert_eq!(fs::read_to_string(dir.path().join("a.jpg")).unwrap(), "a");
        assert_eq!(
            fs::read_to_string(dir.path().join("day_00001.jpg")).unwrap(),
            "other"
        );
    }

    #[test]
    fn test_apply_rejects_duplicate_destination() {
        let dir = Path::new("/bucket");
        let plan = RenamePlan {
            steps: vec![
                Rename {
                    from: dir.join("a.jpg"),
                    to: dir.join("x.jpg"),
                },
                Rename {
                    from: dir.join("b.jpg"),
                    to: dir.join("x.jpg"),
                },
            ],
        };
        assert!(matches!(plan.validate(), Err(Error::Conflict { .. })));
    }

    #[test]
    fn test_apply_skips_identity_renames() {
        let dir = tempdir().unwrap();
        let first = touch(dir.path(), "day_00001.jpg", "1");
        let second = touch(dir.path(), "day_00002.jpg", "2");

        let plan = RenamePlan::sequential(vec![second, first], dir.path(), "day", keep_extension);
        assert_eq!(plan.apply().unwrap(), 0);
        assert_eq!(fs::read_to_string(dir.path().join("day_00002.jpg")).unwrap(), "2");
    }

    #[test]
    fn test_apply_overlapping_names_loses_nothing() {
        let dir = tempdir().unwrap();
        // "0.jpg" sorts first and wants "day_00001.jpg", which must move on to 00002
        let zero = touch(dir.path(), "0.jpg", "new");
        let old = touch(dir.path(), "day_00001.jpg", "old");

        let plan = RenamePlan::sequential(vec![old, zero], dir.path(), "day", keep_extension);
        assert_eq!(plan.apply().unwrap(), 2);

        assert_eq!(fs::read_to_string(dir.path().join("day_00001.jpg")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dir.path().join("day_00002.jpg")).unwrap(), "old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
