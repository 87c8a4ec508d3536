//! Persistent page id to file name index.
//!
//! The index lets a renamed page take its generated files with it instead of
//! leaving them behind as orphans. It is written with a temp file and a
//! rename, so a reader sees either the old or the new index.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CodegenError, CodegenResult};

/// Current on-disk format version.
pub const INDEX_VERSION: u32 = 1;

/// Files generated for one page, relative to the frontend directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFiles {
    pub base_name: String,
    pub component_file: String,
    pub css_file: String,
}

impl PageFiles {
    pub fn new(base_name: &str) -> Self {
        Self {
            base_name: base_name.to_string(),
            component_file: format!("src/pages/{}.jsx", base_name),
            css_file: format!("src/styles/{}.css", base_name),
        }
    }
}

/// Mapping from page id to its generated files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIndex {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pages: BTreeMap<String, PageFiles>,
}

impl Default for FileIndex {
    fn default() -> Self {
        Self {
            version: INDEX_VERSION,
            updated_at: None,
            pages: BTreeMap::new(),
        }
    }
}

impl FileIndex {
    /// Load the index at `path`.
    ///
    /// A missing file is an empty index. An unreadable one is logged and
    /// treated as empty; the next sync rebuilds it from the directory state.
    pub fn load(path: &Path) -> CodegenResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(CodegenError::file("read", path, e)),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(index) if index.version == INDEX_VERSION => Ok(index),
            Ok(index) => {
                warn!(
                    "Ignoring file index {} with version {}",
                    path.display(),
                    index.version
                );
                Ok(Self::default())
            }
            Err(e) => {
                warn!("Ignoring unreadable file index {}: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    pub fn get(&self, page_id: &str) -> Option<&PageFiles> {
        self.pages.get(page_id)
    }

    /// Whether both indexes map the same pages to the same files.
    pub fn same_entries(&self, other: &FileIndex) -> bool {
        self.pages == other.pages
    }

    /// Persist atomically. The timestamp is refreshed on every save.
    pub fn save(&mut self, path: &Path) -> CodegenResult<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| CodegenError::file("create", dir, e))?;

        self.updated_at = Some(Utc::now());
        let json = serde_json::to_string_pretty(self)?;

        let mut temp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| CodegenError::file("create temp file in", dir, e))?;
        writeln!(temp, "{}", json).map_err(|e| CodegenError::file("write", path, e))?;
        temp.persist(path)
            .map_err(|e| CodegenError::file("persist", path, e.error))?;

        debug!("Saved file index with {} pages", self.pages.len());
        Ok(())
    }

    /// Save only when the entries differ from `previous`. Returns whether a
    /// save happened.
    pub fn save_if_changed(&mut self, previous: &FileIndex, path: &Path) -> CodegenResult<bool> {
        if self.same_entries(previous) && path.exists() {
            return Ok(false);
        }
        self.save(path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_index_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = FileIndex::load(&dir.path().join("file-index.json")).unwrap();
        assert!(index.pages.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".atelier/file-index.json");

        let mut index = FileIndex::default();
        index.pages.insert("p1".to_string(), PageFiles::new("HomePage"));
        index.save(&path).unwrap();

        let loaded = FileIndex::load(&path).unwrap();
        assert!(loaded.same_entries(&index));
        assert!(loaded.updated_at.is_some());
        assert_eq!(
            loaded.get("p1").unwrap().component_file,
            "src/pages/HomePage.jsx"
        );

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"componentFile\""));
    }

    #[test]
    fn test_unchanged_index_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file-index.json");

        let mut index = FileIndex::default();
        index.pages.insert("p1".to_string(), PageFiles::new("HomePage"));
        assert!(index.save_if_changed(&FileIndex::default(), &path).unwrap());

        let previous = FileIndex::load(&path).unwrap();
        let mut again = index.clone();
        assert!(!again.save_if_changed(&previous, &path).unwrap());
    }

    #[test]
    fn test_corrupt_index_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file-index.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(FileIndex::load(&path).unwrap().pages.is_empty());
    }
}
