// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for qtscaffold.
//!
//! Pure logic: option schemas, version gates, variants and the decisions a
//! render pass shares between sibling files. Templating and I/O are behind
//! ports defined in the application layer.
//!
//! - **No I/O**: no filesystem or environment access
//! - **Immutable values**: configuration and contexts are built once
//! - **Errors are data**: every failure is a `Clone` enum
pub mod common;
pub mod config;
pub mod context;
pub mod decisions;
pub mod error;
pub mod project;
pub mod schema;
pub mod variant;
pub mod version;

mod validation;

pub use common::RelativePath;
pub use config::{Configuration, ConfigurationBuilder, OptionValue};
pub use context::{ContextValue, RenderContext};
pub use decisions::{
    DECISION_INPUTS, FILE_NAME, GuardStyle, SharedDecisions, UiDecision, UiShape,
    decision_inputs, provided_names, source_option,
};
pub use error::{
    ConfigError, DomainError, ErrorCategory, TemplateError, TemplateErrorKind, VersionParseError,
};
pub use project::{RenderedFile, RenderedProject};
pub use schema::{
    Condition, OptionKind, OptionSpec, Presence, Schema, TypedValue, ValidatedConfig,
    is_identifier, is_keyword,
};
pub use validation::DomainValidator;
pub use variant::{FileTemplate, Variant, VariantBuilder, VariantId};
pub use version::{Comparison, GateBranch, GateFamily, QtVersion, VersionPredicate};

#[cfg(test)]
mod tests {
    use super::*;

    fn form_schema() -> Schema {
        Schema::new(vec![
            OptionSpec::new("name", OptionKind::Identifier).required(),
            OptionSpec::new("className", OptionKind::Identifier).default_value("Widget"),
            OptionSpec::new("useForm", OptionKind::Bool).default_value(false),
            OptionSpec::new("uiUsage", OptionKind::choice(["pointer", "member", "inherit"]))
                .default_value("pointer"),
            OptionSpec::new("uiHeaderFile", OptionKind::Text).iff(Condition::All(vec![
                Condition::equals("useForm", true),
                Condition::not_equals("uiUsage", "inherit"),
            ])),
        ])
    }

    // ========================================================================
    // Schema + Decisions
    // ========================================================================

    #[test]
    fn each_ui_usage_yields_exactly_one_shape() {
        let variant = Variant::builder()
            .id("forms")
            .schema(form_schema())
            .file(FileTemplate::new("forms/a.h", "a.h", "a"))
            .build()
            .unwrap();

        let cases = [
            ("pointer", Some("ui_widget.h"), UiShape::Pointer),
            ("member", Some("ui_widget.h"), UiShape::Member),
            ("inherit", None, UiShape::Inherit),
        ];

        for (usage, header, expected) in cases {
            let mut builder = Configuration::builder()
                .set("name", "app")
                .set("useForm", true)
                .set("uiUsage", usage);
            if let Some(header) = header {
                builder = builder.set("uiHeaderFile", header);
            }
            let validated = variant.schema.validate("forms", &builder.build()).unwrap();
            let decisions = SharedDecisions::compute(&variant, &validated).unwrap();
            let ui = decisions.ui.unwrap();
            assert_eq!(ui.shape, expected, "{usage}");
            assert_eq!(ui.header.as_deref(), Some("ui_widget.h"));
        }
    }

    #[test]
    fn validator_entry_points() {
        let gate = GateFamily::new("g", "v")
            .branch("a", VersionPredicate::lt(QtVersion::new(6, 0, 0)))
            .branch("b", VersionPredicate::ge(QtVersion::new(6, 0, 0)));
        assert!(DomainValidator::validate_gate(&gate).is_ok());

        let project = RenderedProject::new(
            VariantId::new("forms").unwrap(),
            vec![RenderedFile::new(RelativePath::try_new("a.h").unwrap(), "a")],
        )
        .unwrap();
        assert!(DomainValidator::validate_project(&project).is_ok());
    }

    // ========================================================================
    // Error surface
    // ========================================================================

    #[test]
    fn gate_errors_are_internal() {
        let err = DomainError::GateNoBranch {
            family: "qmlLoading".into(),
            version: "6.5".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(!err.suggestions().is_empty());
    }
}
