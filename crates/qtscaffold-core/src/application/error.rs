//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Unknown variant identifier.
    #[error("Variant '{variant}' not found")]
    VariantNotFound {
        variant: String,
        available: Vec<String>,
    },

    /// Filesystem operation failed.
    #[error("I/O error at {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    /// A destination file already exists and overwriting was not allowed.
    #[error("{path} already exists")]
    TargetExists { path: PathBuf },

    /// Undoing a failed emission failed too.
    #[error("Rollback failed at {path}: {reason} (after: {cause})")]
    RollbackFailed {
        path: PathBuf,
        reason: String,
        cause: String,
    },

    /// Emission was cancelled; everything written has been undone.
    #[error("Emission cancelled")]
    Cancelled,

    /// The variant catalog could not be read.
    #[error("Variant catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// Lifecycle misuse (a bug in the caller).
    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl ApplicationError {
    pub fn io(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::VariantNotFound { available, .. } => vec![
                format!("Available variants: {}", available.join(", ")),
                "Run 'qtscaffold list' to see them all".into(),
            ],
            Self::Io { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::TargetExists { path } => vec![
                format!("File already exists: {}", path.display()),
                "Use --force to overwrite (previous contents are restored on failure)".into(),
                "Or choose a different output directory".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("Inspect {} manually", path.display()),
                "Some generated files may remain".into(),
            ],
            Self::Cancelled => vec!["Nothing was written".into()],
            Self::CatalogUnavailable { .. } => {
                vec!["Check the --templates directory and its variant.toml files".into()]
            }
            Self::InvalidTransition { .. } => {
                vec!["This appears to be a bug in qtscaffold".into()]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::VariantNotFound { .. } => ErrorCategory::NotFound,
            Self::Io { .. } | Self::RollbackFailed { .. } => ErrorCategory::Io,
            Self::TargetExists { .. } | Self::Cancelled => ErrorCategory::Validation,
            Self::CatalogUnavailable { .. } => ErrorCategory::NotFound,
            Self::InvalidTransition { .. } => ErrorCategory::Internal,
        }
    }
}
