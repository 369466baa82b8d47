//! Filesystem operations the pipeline performs on the product tree.
//!
//! Every pipeline step goes through [`ProductStore`] instead of `std::fs`,
//! so step semantics can be exercised against [`MemoryStore`].

mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub trait ProductStore: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and any missing parents. Existing directories are fine.
    fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Regular files directly inside `dir`, sorted by name.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Directories directly inside `dir`, sorted by name.
    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a file, replacing any existing one. The parent must exist.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn copy(&self, from: &Path, to: &Path) -> Result<()>;

    /// Move a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Delete `target` if present, then rename `replacement` onto it.
    fn replace(&self, replacement: &Path, target: &Path) -> Result<()> {
        if self.exists(target) {
            self.remove_file(target)?;
        }
        self.rename(replacement, target)
    }

    /// Move every entry of `from` into `to`, keeping names.
    fn move_contents(&self, from: &Path, to: &Path) -> Result<Vec<PathBuf>> {
        let mut moved = Vec::new();
        let mut entries = self.list_dirs(from)?;
        entries.extend(self.list_files(from)?);
        for entry in entries {
            let Some(name) = entry.file_name() else {
                continue;
            };
            let dest = to.join(name);
            if self.is_dir(&dest) && self.is_dir(&entry) {
                self.ensure_dir(&dest)?;
                self.move_contents(&entry, &dest)?;
                self.remove_dir_all(&entry)?;
            } else {
                self.rename(&entry, &dest)?;
            }
            moved.push(dest);
        }
        Ok(moved)
    }
}
