//! Per-project sync serialization.
//!
//! A sync reads the file index, mutates files and writes the index back.
//! Two syncs of the same output directory must not interleave.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;

lazy_static! {
    static ref SHARED: Arc<ProjectLocks> = Arc::new(ProjectLocks::new());
}

/// One mutex per output directory.
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide lock table.
    pub fn shared() -> Arc<ProjectLocks> {
        Arc::clone(&SHARED)
    }

    /// The mutex guarding `root`. Equivalent spellings of a directory share
    /// one mutex, whether or not the directory exists yet.
    pub fn for_project(&self, root: &Path) -> Arc<Mutex<()>> {
        let key = lock_key(root);
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(key).or_default())
    }

    /// Number of projects seen so far.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Canonical form of `root`: the deepest existing ancestor is resolved and
/// the missing components are appended.
fn lock_key(root: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut current = root;
    loop {
        if let Ok(canonical) = current.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |path: PathBuf, part| path.join(part));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            _ => return root.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_project_shares_lock() {
        let dir = tempfile::tempdir().unwrap();
        let locks = ProjectLocks::new();

        let a = locks.for_project(dir.path());
        let b = locks.for_project(&dir.path().join("."));
        assert!(Arc::ptr_eq(&a, &b));

        let later = dir.path().join("not-yet");
        let before = locks.for_project(&later);
        std::fs::create_dir(&later).unwrap();
        assert!(Arc::ptr_eq(&before, &locks.for_project(&later)));

        let other = locks.for_project(Path::new("/nonexistent/other"));
        assert!(!Arc::ptr_eq(&a, &other));
        assert_eq!(locks.len(), 3);
    }

    #[test]
    fn test_lock_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let locks = ProjectLocks::new();
        let lock = locks.for_project(dir.path());

        let guard = lock.lock();
        assert!(locks.for_project(dir.path()).try_lock().is_none());
        drop(guard);
        assert!(locks.for_project(dir.path()).try_lock().is_some());
    }
}
