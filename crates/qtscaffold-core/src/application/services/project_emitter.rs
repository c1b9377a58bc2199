//! Project Emitter - writes a rendered project all-or-nothing.
//!
//! Every change is journaled as it happens. On any failure, or when the
//! cancel flag is raised between writes, the journal is replayed in reverse:
//!
//! | Journal entry        | Undo                        |
//! |----------------------|-----------------------------|
//! | `CreatedDir`         | remove the (empty) directory |
//! | `CreatedFile`        | remove the file             |
//! | `Replaced(previous)` | write `previous` back       |

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{DomainValidator as validator, RenderedProject},
    error::{ScaffoldError, ScaffoldResult},
};

/// Caller-owned emission policy.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Replace existing files instead of refusing.
    pub overwrite: bool,
    /// Checked before every write; raising it rolls everything back.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl EmitOptions {
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

/// What an emission changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub root: PathBuf,
    pub directories_created: Vec<PathBuf>,
    pub files_created: Vec<PathBuf>,
    pub files_replaced: Vec<PathBuf>,
}

impl EmitReport {
    pub fn files_written(&self) -> usize {
        self.files_created.len() + self.files_replaced.len()
    }
}

#[derive(Debug)]
enum JournalEntry {
    CreatedDir(PathBuf),
    CreatedFile(PathBuf),
    Replaced { path: PathBuf, previous: String },
}

pub struct ProjectEmitter<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> ProjectEmitter<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    #[instrument(
        skip_all,
        fields(
            variant = %project.variant(),
            root = %root.as_ref().display(),
            files = project.len()
        )
    )]
    pub fn emit(
        &self,
        project: &RenderedProject,
        root: impl AsRef<Path>,
        options: &EmitOptions,
    ) -> ScaffoldResult<EmitReport> {
        let root = root.as_ref();
        validator::validate_project(project)?;
        self.preflight(project, root, options)?;

        let mut journal = Vec::new();
        match self.write_all(project, root, options, &mut journal) {
            Ok(()) => {
                let report = report_from(root, &journal);
                info!(
                    created = report.files_created.len(),
                    replaced = report.files_replaced.len(),
                    "project emitted"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, entries = journal.len(), "emission failed, rolling back");
                self.rollback(journal, &e)?;
                info!("rollback complete");
                Err(e)
            }
        }
    }

    /// Refuse before touching anything.
    fn preflight(
        &self,
        project: &RenderedProject,
        root: &Path,
        options: &EmitOptions,
    ) -> ScaffoldResult<()> {
        if self.filesystem.exists(root) && !self.filesystem.is_dir(root) {
            return Err(ApplicationError::io(root, "not a directory").into());
        }

        for file in project.files() {
            let dest = root.join(file.path.as_path());
            if !self.filesystem.exists(&dest) {
                continue;
            }
            if self.filesystem.is_dir(&dest) {
                return Err(ApplicationError::io(&dest, "is a directory").into());
            }
            if !options.overwrite {
                return Err(ApplicationError::TargetExists { path: dest }.into());
            }
        }
        Ok(())
    }

    fn write_all(
        &self,
        project: &RenderedProject,
        root: &Path,
        options: &EmitOptions,
        journal: &mut Vec<JournalEntry>,
    ) -> ScaffoldResult<()> {
        self.create_dir_chain(root, journal)?;
        for dir in project.directories() {
            self.create_dir_chain(&root.join(dir), journal)?;
        }

        for file in project.files() {
            if options.is_cancelled() {
                return Err(ApplicationError::Cancelled.into());
            }

            let dest = root.join(file.path.as_path());
            if options.overwrite && self.filesystem.exists(&dest) {
                let previous = self.filesystem.read_to_string(&dest)?;
                self.filesystem.write_file(&dest, &file.content)?;
                journal.push(JournalEntry::Replaced {
                    path: dest,
                    previous,
                });
            } else {
                // Refuses a file that appeared after preflight.
                self.filesystem.create_file(&dest, &file.content)?;
                journal.push(JournalEntry::CreatedFile(dest));
            }
        }

        if options.is_cancelled() {
            return Err(ApplicationError::Cancelled.into());
        }
        Ok(())
    }

    /// Create `dir` and any missing ancestors, journaling each one.
    fn create_dir_chain(&self, dir: &Path, journal: &mut Vec<JournalEntry>) -> ScaffoldResult<()> {
        let missing: Vec<&Path> = dir
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && !self.filesystem.exists(p))
            .collect();

        for path in missing.into_iter().rev() {
            self.filesystem.create_dir(path)?;
            debug!(path = %path.display(), "created directory");
            journal.push(JournalEntry::CreatedDir(path.to_path_buf()));
        }
        Ok(())
    }

    fn rollback(&self, journal: Vec<JournalEntry>, cause: &ScaffoldError) -> ScaffoldResult<()> {
        for entry in journal.into_iter().rev() {
            let (path, result) = match entry {
                JournalEntry::CreatedFile(path) => {
                    let result = self.filesystem.remove_file(&path);
                    (path, result)
                }
                JournalEntry::Replaced { path, previous } => {
                    let result = self.filesystem.write_file(&path, &previous);
                    (path, result)
                }
                JournalEntry::CreatedDir(path) => {
                    let result = self.filesystem.remove_dir(&path);
                    (path, result)
                }
            };

            if let Err(e) = result {
                warn!(path = %path.display(), error = %e, "rollback step failed");
                return Err(ApplicationError::RollbackFailed {
                    path,
                    reason: e.to_string(),
                    cause: cause.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

fn report_from(root: &Path, journal: &[JournalEntry]) -> EmitReport {
    let mut report = EmitReport {
        root: root.to_path_buf(),
        ..EmitReport::default()
    };
    for entry in journal {
        match entry {
            JournalEntry::CreatedDir(p) => report.directories_created.push(p.clone()),
            JournalEntry::CreatedFile(p) => report.files_created.push(p.clone()),
            JournalEntry::Replaced { path, .. } => report.files_replaced.push(path.clone()),
        }
    }
    report
}
