//! Change-aware file writes.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::{CodegenError, CodegenResult};

/// Write `content` unless the file already holds exactly that. Returns
/// whether the file was written.
pub fn write_if_changed(path: &Path, content: &str) -> CodegenResult<bool> {
    match fs::read_to_string(path) {
        Ok(existing) if existing == content => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::InvalidData => {}
        Err(e) => return Err(CodegenError::file("read", path, e)),
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CodegenError::file("create", parent, e))?;
    }
    fs::write(path, content).map_err(|e| CodegenError::file("write", path, e))?;
    debug!("Wrote {}", path.display());
    Ok(true)
}

/// Delete a file. Returns whether it existed.
pub fn remove_if_exists(path: &Path) -> CodegenResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CodegenError::file("remove", path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/file.txt");

        assert!(write_if_changed(&path, "one").unwrap());
        assert!(!write_if_changed(&path, "one").unwrap());
        assert!(write_if_changed(&path, "two").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_remove_if_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        assert!(!remove_if_exists(&path).unwrap());
        fs::write(&path, "x").unwrap();
        assert!(remove_if_exists(&path).unwrap());
        assert!(!path.exists());
    }
}
