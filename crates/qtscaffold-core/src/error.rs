//! Unified error handling for qtscaffold Core.
//!
//! This module provides a unified error type that wraps the configuration,
//! version, template, domain and application errors, with user-actionable
//! suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{ConfigError, DomainError, TemplateError, VersionParseError};

/// Root error type for qtscaffold Core operations.
///
/// Every scaffold operation fails with exactly one of these; none of them is
/// retried or downgraded.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScaffoldError {
    /// Missing, mistyped or mutually inconsistent option. Always raised
    /// before any template is rendered.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed version string.
    #[error("Version error: {0}")]
    VersionParse(#[from] VersionParseError),

    /// Undefined field or malformed expression in a template.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Catalog or structure invariant violated.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Orchestration failures: lookup, emission, rollback.
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ScaffoldError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::VersionParse(e) => vec![
                format!("'{}' is not a version", e.input),
                "Use MAJOR.MINOR or MAJOR.MINOR.PATCH, e.g. 6.5 or 6.8.1".into(),
            ],
            Self::Template(e) => vec![
                format!("Template '{}' could not be rendered", e.template),
                "The variant catalog is inconsistent; check custom templates".into(),
            ],
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in qtscaffold".into(),
                "Please report this issue with the command you ran".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) | Self::VersionParse(_) => ErrorCategory::Validation,
            Self::Template(_) => ErrorCategory::Rendering,
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Catalog => ErrorCategory::Rendering,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether the failure happened before any rendering started.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::Config(_) | Self::VersionParse(_))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Rendering,
    Io,
    Internal,
}

/// Convenient result type alias.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_validation_failures() {
        let err: ScaffoldError = ConfigError::MissingOption {
            variant: "qwidget".into(),
            option: "uiHeaderFile".into(),
            reason: "required when useForm is true".into(),
        }
        .into();

        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.is_validation_failure());
        assert!(err.to_string().contains("uiHeaderFile"));
    }

    #[test]
    fn version_errors_suggest_format() {
        let err: ScaffoldError = VersionParseError {
            input: "six".into(),
            reason: "unexpected character".into(),
        }
        .into();

        assert!(err.suggestions().iter().any(|s| s.contains("MAJOR.MINOR")));
    }

    #[test]
    fn variant_not_found_is_not_found() {
        let err: ScaffoldError = ApplicationError::VariantNotFound {
            variant: "qml".into(),
            available: vec!["qtquick".into(), "qwidget".into()],
        }
        .into();

        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.is_validation_failure());
    }
}
