//! In-memory filesystem adapter for testing.
//!
//! Behaves like a strict local filesystem (parents must exist, only empty
//! directories can be removed) and can be told to fail a specific write.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use qtscaffold_core::{
    application::{ApplicationError, ports::Filesystem},
    error::ScaffoldResult,
};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    writes: usize,
    fail_on_write: Option<usize>,
}

fn lock_error(path: &Path) -> ApplicationError {
    ApplicationError::io(path, "memory filesystem lock poisoned")
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th write (1-based, counted from now) fail.
    pub fn fail_on_write(&self, n: usize) {
        if let Ok(mut inner) = self.inner.write() {
            inner.fail_on_write = Some(inner.writes + n);
        }
    }

    /// Seed a file, creating its parent directories.
    pub fn insert_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let path = path.into();
        if let Ok(mut inner) = self.inner.write() {
            for ancestor in path.ancestors().skip(1) {
                if !ancestor.as_os_str().is_empty() {
                    inner.directories.insert(ancestor.to_path_buf());
                }
            }
            inner.files.insert(path, content.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// List all directories, sorted.
    pub fn list_directories(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.directories.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.is_empty() && inner.directories.is_empty())
            .unwrap_or(true)
    }
}

impl MemoryFilesystemInner {
    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.directories.contains(parent),
            _ => true,
        }
    }

    fn store(&mut self, path: &Path, content: &str, clobber: bool) -> ScaffoldResult<()> {
        self.writes += 1;
        if self.fail_on_write == Some(self.writes) {
            return Err(ApplicationError::io(path, "injected write failure").into());
        }
        if !self.parent_exists(path) {
            return Err(ApplicationError::io(path, "parent directory does not exist").into());
        }
        if self.directories.contains(path) {
            return Err(ApplicationError::io(path, "is a directory").into());
        }
        if !clobber && self.files.contains_key(path) {
            return Err(ApplicationError::TargetExists {
                path: path.to_path_buf(),
            }
            .into());
        }

        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir(&self, path: &Path) -> ScaffoldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;

        if inner.directories.contains(path) || inner.files.contains_key(path) {
            return Err(ApplicationError::io(path, "already exists").into());
        }
        if !inner.parent_exists(path) {
            return Err(ApplicationError::io(path, "parent directory does not exist").into());
        }

        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;
        inner.store(path, content, true)
    }

    fn create_file(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;
        inner.store(path, content, false)
    }

    fn read_to_string(&self, path: &Path) -> ScaffoldResult<String> {
        let inner = self.inner.read().map_err(|_| lock_error(path))?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::io(path, "no such file").into())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_file(&self, path: &Path) -> ScaffoldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| ApplicationError::io(path, "no such file").into())
    }

    fn remove_dir(&self, path: &Path) -> ScaffoldResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;

        let occupied = inner.files.keys().any(|p| p.parent() == Some(path))
            || inner.directories.iter().any(|d| d.parent() == Some(path));
        if occupied {
            return Err(ApplicationError::io(path, "directory not empty").into());
        }
        if !inner.directories.remove(path) {
            return Err(ApplicationError::io(path, "no such directory").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtscaffold_core::error::ScaffoldError;

    #[test]
    fn parents_must_exist() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("out/main.cpp"), "x").is_err());
        fs.create_dir(Path::new("out")).unwrap();
        fs.write_file(Path::new("out/main.cpp"), "x").unwrap();
        assert_eq!(fs.read_file("out/main.cpp").as_deref(), Some("x"));
    }

    #[test]
    fn injected_failure_hits_the_nth_write() {
        let fs = MemoryFilesystem::new();
        fs.fail_on_write(2);
        assert!(fs.write_file(Path::new("a"), "1").is_ok());
        assert!(fs.write_file(Path::new("b"), "2").is_err());
        assert!(fs.write_file(Path::new("c"), "3").is_ok());
        assert_eq!(fs.list_files(), vec![PathBuf::from("a"), PathBuf::from("c")]);
    }

    #[test]
    fn create_keeps_existing_file() {
        let fs = MemoryFilesystem::new();
        fs.insert_file("out/main.cpp", "theirs");

        let err = fs.create_file(Path::new("out/main.cpp"), "ours").unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Application(ApplicationError::TargetExists { .. })
        ));
        assert_eq!(fs.read_file("out/main.cpp").as_deref(), Some("theirs"));

        fs.create_file(Path::new("out/widget.h"), "ours").unwrap();
        assert_eq!(fs.read_file("out/widget.h").as_deref(), Some("ours"));
    }

    #[test]
    fn remove_dir_requires_empty() {
        let fs = MemoryFilesystem::new();
        fs.insert_file("out/i18n/app.qrc", "x");
        assert!(fs.remove_dir(Path::new("out/i18n")).is_err());
        fs.remove_file(Path::new("out/i18n/app.qrc")).unwrap();
        fs.remove_dir(Path::new("out/i18n")).unwrap();
        assert_eq!(fs.list_directories(), vec![PathBuf::from("out")]);
    }
}
