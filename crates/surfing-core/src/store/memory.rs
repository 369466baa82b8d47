use std::collections::{BTreeMap, BTreeSet};
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Result, SurfingError};

use super::ProductStore;

/// In-memory product tree with filesystem semantics.
///
/// Writes require an existing parent directory, renames of missing sources
/// fail, and listings are sorted, matching what [`super::DiskStore`] does on
/// a real disk. Clones share the same tree.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tree>>,
}

#[derive(Default)]
struct Tree {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

impl Tree {
    fn dir_exists(&self, path: &Path) -> bool {
        is_root(path) || self.dirs.contains(path)
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) => self.dir_exists(parent),
            None => true,
        }
    }
}

fn is_root(path: &Path) -> bool {
    path.as_os_str().is_empty() || path == Path::new("/") || path == Path::new(".")
}

fn not_found(op: &'static str, path: &Path) -> SurfingError {
    SurfingError::path_io(op, path, Error::new(ErrorKind::NotFound, "no such file or directory"))
}

fn conflict(op: &'static str, path: &Path, msg: &str) -> SurfingError {
    SurfingError::path_io(op, path, Error::new(ErrorKind::AlreadyExists, msg.to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        // A panic while holding the lock leaves the tree usable for inspection.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Every file in the store, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.tree().files.keys().cloned().collect()
    }

    /// Every directory in the store, sorted.
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.tree().dirs.iter().cloned().collect()
    }

    pub fn read_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Create a file and all of its parent directories.
    pub fn seed(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.ensure_dir(parent)?;
        }
        self.write(path, contents)
    }
}

impl ProductStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        let tree = self.tree();
        tree.files.contains_key(path) || tree.dir_exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.tree().dir_exists(path)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        let mut tree = self.tree();
        let mut missing = Vec::new();
        for ancestor in path.ancestors() {
            if is_root(ancestor) || tree.dirs.contains(ancestor) {
                break;
            }
            if tree.files.contains_key(ancestor) {
                return Err(conflict("create_dir", ancestor, "file exists"));
            }
            missing.push(ancestor.to_path_buf());
        }
        tree.dirs.extend(missing);
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let tree = self.tree();
        if !tree.dir_exists(dir) {
            return Err(not_found("read_dir", dir));
        }
        Ok(tree
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let tree = self.tree();
        if !tree.dir_exists(dir) {
            return Err(not_found("read_dir", dir));
        }
        Ok(tree
            .dirs
            .iter()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.tree()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("read", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut tree = self.tree();
        if !tree.parent_exists(path) {
            return Err(not_found("write", path));
        }
        if tree.dir_exists(path) {
            return Err(conflict("write", path, "is a directory"));
        }
        tree.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let contents = self.read(from)?;
        self.write(to, &contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let mut tree = self.tree();
        if !tree.parent_exists(to) {
            return Err(not_found("rename", to));
        }
        if let Some(contents) = tree.files.get(from).cloned() {
            if tree.dir_exists(to) {
                return Err(conflict("rename", to, "is a directory"));
            }
            tree.files.remove(from);
            tree.files.insert(to.to_path_buf(), contents);
            return Ok(());
        }
        if !tree.dirs.contains(from) {
            return Err(not_found("rename", from));
        }
        if tree.files.contains_key(to) {
            return Err(conflict("rename", to, "not a directory"));
        }
        let occupied = tree.files.keys().any(|p| p.starts_with(to))
            || tree.dirs.iter().any(|p| p != to && p.starts_with(to));
        if occupied {
            return Err(conflict("rename", to, "directory not empty"));
        }

        let rekey = |p: &Path| to.join(p.strip_prefix(from).unwrap_or(p));
        let moved_dirs: Vec<PathBuf> = tree
            .dirs
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for dir in moved_dirs {
            tree.dirs.remove(&dir);
            tree.dirs.insert(rekey(&dir));
        }
        let moved_files: Vec<PathBuf> = tree
            .files
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for file in moved_files {
            if let Some(contents) = tree.files.remove(&file) {
                tree.files.insert(rekey(&file), contents);
            }
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.tree()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found("remove_file", path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let mut tree = self.tree();
        if !tree.dirs.contains(path) {
            return Err(not_found("remove_dir", path));
        }
        tree.files.retain(|p, _| !p.starts_with(path));
        tree.dirs.retain(|p| !p.starts_with(path));
        Ok(())
    }
}
