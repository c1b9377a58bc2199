// ============================================================================
// domain/error.rs - ERROR DOMAIN
// ============================================================================

use std::fmt;

use thiserror::Error;

/// Catalog and structure invariant violations.
///
/// All errors are:
/// - Cloneable (reported once, kept in lifecycle history)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Catalog Errors
    // ========================================================================
    #[error("Invalid variant: {0}")]
    InvalidVariant(String),

    #[error("Variant '{variant}' has no file templates")]
    EmptyVariant { variant: String },

    #[error("Duplicate output path: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project root: {path}")]
    PathEscapesRoot { path: String },

    #[error("Template '{template}' of variant '{variant}' references undeclared field '{field}'")]
    UndeclaredField {
        variant: String,
        template: String,
        field: String,
    },

    #[error(
        "Template '{template}' of variant '{variant}' reads '{option}' directly; use '{decision}' instead"
    )]
    RawDecisionInput {
        variant: String,
        template: String,
        option: String,
        decision: &'static str,
    },

    // ========================================================================
    // Gate Errors
    // ========================================================================
    #[error("Gate family '{family}' has no branch for version {version}")]
    GateNoBranch { family: String, version: String },

    #[error("Gate family '{family}' selects several branches for version {version}: {labels:?}")]
    GateAmbiguous {
        family: String,
        version: String,
        labels: Vec<String>,
    },

    #[error("Gate family '{family}' is invalid: {reason}")]
    InvalidGate { family: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidVariant(msg) => vec![
                "Check the variant definition".into(),
                format!("Details: {}", msg),
            ],
            Self::UndeclaredField { field, .. } => vec![
                format!("Declare '{}' in the variant's option schema", field),
                "Or remove the reference from the template".into(),
            ],
            Self::RawDecisionInput {
                option, decision, ..
            } => vec![
                format!("'{}' is resolved once per render pass", option),
                format!("Branch on '{}' so every file sees the same decision", decision),
            ],
            Self::GateNoBranch { .. } | Self::GateAmbiguous { .. } | Self::InvalidGate { .. } => {
                vec!["Gate branches must cover every version exactly once".into()]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::GateNoBranch { .. } | Self::GateAmbiguous { .. } => ErrorCategory::Internal,
            Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. } => ErrorCategory::Validation,
            _ => ErrorCategory::Catalog,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Catalog,
    Internal,
}

/// Option-level configuration problems, detected before rendering.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("option '{option}' is not used by variant '{variant}'")]
    UnknownOption { variant: String, option: String },

    #[error("option '{option}' is missing for variant '{variant}': {reason}")]
    MissingOption {
        variant: String,
        option: String,
        reason: String,
    },

    #[error("option '{option}' must not be set for variant '{variant}': {reason}")]
    UnexpectedOption {
        variant: String,
        option: String,
        reason: String,
    },

    #[error("option '{option}' expects {expected}, got {found}")]
    TypeMismatch {
        variant: String,
        option: String,
        expected: String,
        found: String,
    },

    #[error("option '{option}' has value '{value}', expected one of {allowed:?}")]
    InvalidChoice {
        variant: String,
        option: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("option '{option}' value '{value}' is not a valid identifier")]
    InvalidIdentifier {
        variant: String,
        option: String,
        value: String,
    },

    #[error("option '{option}' must not be empty")]
    EmptyValue { variant: String, option: String },

    #[error("option '{option}' = '{value}' gives two files the path '{path}'")]
    ConflictingPath {
        variant: String,
        option: String,
        value: String,
        path: String,
    },
}

impl ConfigError {
    /// Name of the offending option.
    pub fn option(&self) -> &str {
        match self {
            Self::UnknownOption { option, .. }
            | Self::MissingOption { option, .. }
            | Self::UnexpectedOption { option, .. }
            | Self::TypeMismatch { option, .. }
            | Self::InvalidChoice { option, .. }
            | Self::InvalidIdentifier { option, .. }
            | Self::EmptyValue { option, .. }
            | Self::ConflictingPath { option, .. } => option,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownOption { variant, .. } => vec![
                format!("Run 'qtscaffold show {}' to list its options", variant),
            ],
            Self::MissingOption { option, .. } => vec![
                format!("Provide it with --set {}=<value>", option),
            ],
            Self::UnexpectedOption { option, reason, .. } => vec![
                format!("Remove '{}' ({})", option, reason),
            ],
            Self::InvalidChoice { allowed, .. } => {
                vec![format!("Allowed values: {}", allowed.join(", "))]
            }
            Self::InvalidIdentifier { .. } => vec![
                "Identifiers start with a letter or '_' and contain only letters, digits and '_'"
                    .into(),
                "C++ keywords such as 'class' or 'int' cannot be used".into(),
            ],
            Self::TypeMismatch { expected, .. } => {
                vec![format!("Provide {} instead", expected)]
            }
            Self::EmptyValue { .. } => vec!["Provide a non-empty value".into()],
            Self::ConflictingPath { option, .. } => vec![
                format!("Choose a different value for '{}'", option),
            ],
        }
    }
}

/// A version string that is not `MAJOR[.MINOR[.PATCH]]`.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("cannot parse version '{input}': {reason}")]
pub struct VersionParseError {
    pub input: String,
    pub reason: String,
}

/// Why a template failed to render.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateErrorKind {
    #[error("undefined field '{field}'")]
    UndefinedField { field: String },

    #[error("syntax error")]
    Syntax,

    #[error("evaluation failed")]
    Evaluation,
}

/// A template failure, identified by template name and location.
#[derive(Debug, Error, Clone, PartialEq)]
pub struct TemplateError {
    pub template: String,
    pub kind: TemplateErrorKind,
    pub line: Option<usize>,
    pub detail: String,
}

impl TemplateError {
    pub fn undefined_field(
        template: impl Into<String>,
        field: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self {
            template: template.into(),
            kind: TemplateErrorKind::UndefinedField {
                field: field.into(),
            },
            line,
            detail: String::new(),
        }
    }

    /// Field name for undefined-field errors.
    pub fn field(&self) -> Option<&str> {
        match &self.kind {
            TemplateErrorKind::UndefinedField { field } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        write!(f, ": {}", self.kind)?;
        if !self.detail.is_empty() {
            write!(f, " ({})", self.detail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_error_names_template_field_and_line() {
        let err = TemplateError::undefined_field("qwidget/widget.h", "ui.header", Some(7));
        assert_eq!(
            err.to_string(),
            "qwidget/widget.h:7: undefined field 'ui.header'"
        );
        assert_eq!(err.field(), Some("ui.header"));
    }

    #[test]
    fn config_error_exposes_option() {
        let err = ConfigError::InvalidChoice {
            variant: "qwidget".into(),
            option: "uiUsage".into(),
            value: "shared".into(),
            allowed: vec!["pointer".into(), "member".into(), "inherit".into()],
        };
        assert_eq!(err.option(), "uiUsage");
        assert!(err.suggestions()[0].contains("pointer, member, inherit"));
    }
}
