use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SurfingError};

use super::ProductStore;

/// Product store backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl DiskStore {
    pub fn new() -> Self {
        Self
    }

    fn entries(&self, dir: &Path, want_dirs: bool) -> Result<Vec<PathBuf>> {
        let read = fs::read_dir(dir).map_err(|e| SurfingError::path_io("read_dir", dir, e))?;
        let mut out = Vec::new();
        for entry in read {
            let entry = entry.map_err(|e| SurfingError::path_io("read_dir", dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| SurfingError::path_io("stat", entry.path(), e))?;
            // Symlinks are classified by their target.
            let is_dir = if file_type.is_symlink() {
                entry.path().is_dir()
            } else {
                file_type.is_dir()
            };
            if is_dir == want_dirs {
                out.push(entry.path());
            }
        }
        out.sort();
        Ok(out)
    }
}

impl ProductStore for DiskStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| SurfingError::path_io("create_dir", path, e))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.entries(dir, false)
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.entries(dir, true)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| SurfingError::path_io("read", path, e))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).map_err(|e| SurfingError::path_io("write", path, e))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| SurfingError::path_io("copy", from, e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).map_err(|e| SurfingError::path_io("rename", from, e))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| SurfingError::path_io("remove_file", path, e))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).map_err(|e| SurfingError::path_io("remove_dir", path, e))
    }
}
