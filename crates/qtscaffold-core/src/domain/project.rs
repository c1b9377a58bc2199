use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use super::common::RelativePath;
use super::error::DomainError;
use super::variant::VariantId;

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: RelativePath,
    pub content: String,
}

impl RenderedFile {
    pub fn new(path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            path,
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// The complete output of one render pass, in catalog order.
///
/// This is data only; writing it is the emitter's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedProject {
    variant: VariantId,
    files: Vec<RenderedFile>,
}

impl RenderedProject {
    pub fn new(variant: VariantId, files: Vec<RenderedFile>) -> Result<Self, DomainError> {
        let project = Self { variant, files };
        project.validate()?;
        Ok(project)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.files.is_empty() {
            return Err(DomainError::EmptyVariant {
                variant: self.variant.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.path.as_path()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn variant(&self) -> &VariantId {
        &self.variant
    }

    pub fn files(&self) -> &[RenderedFile] {
        &self.files
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&RenderedFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path.as_path() == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Parent directories the files need, shallowest first.
    pub fn directories(&self) -> Vec<PathBuf> {
        let mut dirs = BTreeSet::new();
        for file in &self.files {
            let mut parent = file.path.as_path().parent();
            while let Some(dir) = parent {
                if dir.as_os_str().is_empty() {
                    break;
                }
                dirs.insert(dir.to_path_buf());
                parent = dir.parent();
            }
        }
        let mut dirs: Vec<PathBuf> = dirs.into_iter().collect();
        dirs.sort_by_key(|d| d.components().count());
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> RenderedFile {
        RenderedFile::new(RelativePath::try_new(path).unwrap(), "x")
    }

    fn id() -> VariantId {
        VariantId::new("qwidget").unwrap()
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let result = RenderedProject::new(id(), vec![file("widget.h"), file("widget.h")]);
        assert!(matches!(result, Err(DomainError::DuplicatePath { .. })));
    }

    #[test]
    fn directories_are_listed_shallowest_first() {
        let project = RenderedProject::new(
            id(),
            vec![file("main.cpp"), file("i18n/lang/de.ts"), file("i18n/app.qrc")],
        )
        .unwrap();

        assert_eq!(
            project.directories(),
            vec![PathBuf::from("i18n"), PathBuf::from("i18n/lang")]
        );
        assert!(project.file("main.cpp").is_some());
    }
}
