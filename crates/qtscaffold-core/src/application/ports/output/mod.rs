//! Driven (output) ports - implemented by infrastructure.

use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::{RenderContext, TemplateError, Variant};
use crate::error::ScaffoldResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `qtscaffold_adapters::filesystem::LocalFilesystem` (production)
/// - `qtscaffold_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Operations are deliberately single-step (one directory, one file) so the
/// emitter can journal each one and undo it.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create one directory. The parent must exist.
    fn create_dir(&self, path: &Path) -> ScaffoldResult<()>;

    /// Write a whole file. Either the new content lands or nothing changes.
    fn write_file(&self, path: &Path, content: &str) -> ScaffoldResult<()>;

    /// Write a file that must not exist yet.
    ///
    /// Fails with `ApplicationError::TargetExists` when something already
    /// occupies `path`; the existing entry is left untouched.
    fn create_file(&self, path: &Path, content: &str) -> ScaffoldResult<()>;

    fn read_to_string(&self, path: &Path) -> ScaffoldResult<String>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> ScaffoldResult<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> ScaffoldResult<()>;
}

/// Port for variant lookup.
///
/// Implemented by:
/// - `qtscaffold_adapters::catalog::BuiltinCatalog` (embedded variants)
/// - `qtscaffold_adapters::catalog::DirectoryCatalog` (manifests on disk)
#[cfg_attr(test, mockall::automock)]
pub trait VariantCatalog: Send + Sync {
    /// All variants, ordered by id.
    fn list(&self) -> ScaffoldResult<Vec<Variant>>;

    /// A single variant, or `None` when the id is unknown.
    fn find(&self, id: &str) -> ScaffoldResult<Option<Variant>>;
}

/// Port for template evaluation.
///
/// Implemented by `qtscaffold_adapters::engine::MiniJinjaEngine`.
///
/// Rendering is pure: same source and context, same text. Undefined fields
/// are errors, never empty strings.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateEngine: Send + Sync {
    fn render(
        &self,
        name: &str,
        source: &str,
        context: &RenderContext,
    ) -> Result<String, TemplateError>;

    /// Every context path the template reads, e.g. `guard.token`.
    ///
    /// Loop variables and names the template assigns itself are excluded.
    fn referenced_fields(&self, name: &str, source: &str)
    -> Result<BTreeSet<String>, TemplateError>;
}
