//! Input collection.
//!
//! Turns the command line paths into a stream of regular files. Directories
//! are expanded one level at a time, like `<dir>/*`, with their entries
//! queued behind the remaining arguments. Symlinks are followed and there is
//! no loop detection.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Queue of paths still to be visited.
#[derive(Debug, Default)]
pub struct InputQueue {
    queue: VecDeque<PathBuf>,
}

impl InputQueue {
    /// Creates a queue from the given paths, in order.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            queue: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the entries of a directory in listing order, skipping hidden
    /// ones. A directory that cannot be read has no entries.
    fn expand(dir: &Path) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(path = %dir.display(), %err, "cannot list directory");
                return Vec::new();
            }
        };

        entries
            .filter_map(std::result::Result::ok)
            .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
            .map(|entry| dir.join(entry.file_name()))
            .collect()
    }
}

impl Iterator for InputQueue {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(path) = self.queue.pop_front() {
            if path.is_dir() {
                let entries = Self::expand(&path);
                debug!(path = %path.display(), entries = entries.len(), "expanding directory");
                self.queue.extend(entries);
                continue;
            }
            if !path.is_file() {
                debug!(path = %path.display(), "not a regular file, skipping");
                continue;
            }
            return Some(path);
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().display().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_plain_files_pass_through_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.eml");
        let b = dir.path().join("b.eml");
        fs::write(&a, "x").unwrap();
        fs::write(&b, "x").unwrap();

        let files: Vec<PathBuf> = InputQueue::new([b.clone(), a.clone()]).collect();
        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn test_missing_paths_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.eml");
        fs::write(&a, "x").unwrap();

        let files: Vec<PathBuf> =
            InputQueue::new([dir.path().join("missing.eml"), a.clone()]).collect();
        assert_eq!(files, vec![a]);
    }

    #[test]
    fn test_directories_expand_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("top.eml"), "x").unwrap();
        fs::write(root.join("sub/mid.eml"), "x").unwrap();
        fs::write(root.join("sub/deeper/low.eml"), "x").unwrap();
        fs::create_dir(root.join("empty")).unwrap();

        let files: Vec<PathBuf> = InputQueue::new([root]).collect();
        assert!(files.iter().all(|p| p.is_file()));
        assert_eq!(
            names(&files, root),
            vec!["sub/deeper/low.eml", "sub/mid.eml", "top.eml"]
        );
    }

    #[test]
    fn test_directory_entries_follow_remaining_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("d")).unwrap();
        fs::write(root.join("d/inner.eml"), "x").unwrap();
        fs::write(root.join("after.eml"), "x").unwrap();

        let files: Vec<PathBuf> =
            InputQueue::new([root.join("d"), root.join("after.eml")]).collect();
        assert_eq!(files, vec![root.join("after.eml"), root.join("d/inner.eml")]);
    }

    #[test]
    fn test_hidden_entries_are_not_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(".hidden.eml"), "x").unwrap();
        fs::write(root.join("shown.eml"), "x").unwrap();

        let files: Vec<PathBuf> = InputQueue::new([root]).collect();
        assert_eq!(names(&files, root), vec!["shown.eml"]);
    }

    #[test]
    fn test_hidden_file_named_explicitly_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".hidden.eml");
        fs::write(&hidden, "x").unwrap();

        let files: Vec<PathBuf> = InputQueue::new([hidden.clone()]).collect();
        assert_eq!(files, vec![hidden]);
    }
}
