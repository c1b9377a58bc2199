//! Local filesystem adapter.
//!
//! Files are written to a temporary file in the destination directory and
//! then persisted over the final name, so a reader never sees half a file.
//! New files are persisted without clobbering, so a file that appears in the
//! meantime is reported instead of replaced.

use std::io::{self, Write};
use std::path::Path;

use qtscaffold_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ScaffoldError, ScaffoldResult},
};
use tempfile::NamedTempFile;
use tracing::trace;

/// Production filesystem implementation using `std::fs` and `tempfile`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir(&self, path: &Path) -> ScaffoldResult<()> {
        std::fs::create_dir(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
        let tmp = staged(path, content)?;
        tmp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "persist file"))?;

        trace!(path = %path.display(), bytes = content.len(), "file written");
        Ok(())
    }

    fn create_file(&self, path: &Path, content: &str) -> ScaffoldResult<()> {
        let tmp = staged(path, content)?;
        tmp.persist_noclobber(path).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                ApplicationError::TargetExists {
                    path: path.to_path_buf(),
                }
                .into()
            } else {
                map_io_error(path, e.error, "persist file")
            }
        })?;

        trace!(path = %path.display(), bytes = content.len(), "file created");
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> ScaffoldResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_file(&self, path: &Path) -> ScaffoldResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir(&self, path: &Path) -> ScaffoldResult<()> {
        std::fs::remove_dir(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

/// `content` written and synced to a temp file next to `path`.
fn staged(path: &Path, content: &str) -> ScaffoldResult<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| map_io_error(path, e, "create temp file"))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| map_io_error(path, e, "write file"))?;
    Ok(tmp)
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ScaffoldError {
    ApplicationError::Io {
        path: path.to_path_buf(),
        reason: format!("failed to {}: {}", operation, e),
    }
    .into()
}
