//! Built-in variant catalog.
//!
//! The variants that ship with qtscaffold. Template bodies are embedded at
//! compile time and the catalog is built once per process.
//!
//! | Variant   | Files                                                   |
//! |-----------|---------------------------------------------------------|
//! | `qtquick` | `main.cpp`, `Main.qml`                                  |
//! | `qwidget` | `main.cpp`, `<class>.h`, `<class>.cpp`, `translations.qrc` |

use std::sync::LazyLock;

use qtscaffold_core::{
    application::{ApplicationError, ports::VariantCatalog},
    domain::{
        Condition, DomainError, FileTemplate, GateFamily, OptionKind, OptionSpec, QtVersion,
        Schema, Variant, VersionPredicate,
    },
    error::ScaffoldResult,
};
use tracing::debug;

// ── Embedded templates ───────────────────────────────────────────────────────

const QTQUICK_MAIN_CPP: &str = include_str!("../../templates/qtquick/main.cpp.j2");
const QTQUICK_MAIN_QML: &str = include_str!("../../templates/qtquick/Main.qml.j2");
const QWIDGET_MAIN_CPP: &str = include_str!("../../templates/qwidget/main.cpp.j2");
const QWIDGET_HEADER: &str = include_str!("../../templates/qwidget/widget.h.j2");
const QWIDGET_SOURCE: &str = include_str!("../../templates/qwidget/widget.cpp.j2");
const QWIDGET_TRANSLATIONS: &str = include_str!("../../templates/qwidget/translations.qrc.j2");

static BUILTIN: LazyLock<Result<Vec<Variant>, DomainError>> =
    LazyLock::new(|| Ok(vec![qtquick()?, qwidget()?]));

// ── Variant definitions ──────────────────────────────────────────────────────

fn name_option() -> OptionSpec {
    OptionSpec::new("name", OptionKind::Identifier)
        .required()
        .describe("Project name")
}

pub fn qtquick() -> Result<Variant, DomainError> {
    let v6_4 = QtVersion::new(6, 4, 0);
    let v6_5 = QtVersion::new(6, 5, 0);

    Variant::builder()
        .id("qtquick")
        .title("Qt Quick Application")
        .description("QML user interface with a C++ entry point")
        .schema(Schema::new(vec![
            name_option(),
            OptionSpec::new("minimumQtVersion", OptionKind::Version)
                .default_value("6.8")
                .describe("Oldest Qt version the project must build with"),
            OptionSpec::new("useVirtualKeyboard", OptionKind::Bool)
                .default_value(false)
                .describe("Enable the Qt Virtual Keyboard"),
        ]))
        .gate(
            GateFamily::new("qmlLoading", "minimumQtVersion")
                .branch("url", VersionPredicate::lt(v6_5.clone()))
                .branch("module", VersionPredicate::ge(v6_5)),
        )
        .gate(
            GateFamily::new("creationCheck", "minimumQtVersion")
                .branch("failureSignal", VersionPredicate::ge(v6_4.clone()))
                .branch("objectCreated", VersionPredicate::lt(v6_4)),
        )
        .file(FileTemplate::new("qtquick/main.cpp", "main.cpp", QTQUICK_MAIN_CPP))
        .file(FileTemplate::new("qtquick/Main.qml", "Main.qml", QTQUICK_MAIN_QML))
        .build()
}

pub fn qwidget() -> Result<Variant, DomainError> {
    Variant::builder()
        .id("qwidget")
        .title("Qt Widgets Application")
        .description("Widget-based desktop application with an optional Designer form")
        .schema(Schema::new(vec![
            name_option(),
            OptionSpec::new("className", OptionKind::Identifier)
                .default_value("Widget")
                .describe("Main window class name"),
            OptionSpec::new(
                "baseClass",
                OptionKind::choice(["QWidget", "QMainWindow", "QDialog"]),
            )
            .default_value("QWidget")
            .describe("Base class of the main window"),
            OptionSpec::new("useTranslation", OptionKind::Bool)
                .default_value(false)
                .describe("Load translations at startup"),
            OptionSpec::new("languages", OptionKind::List)
                .iff(Condition::equals("useTranslation", true))
                .describe("Locale names to ship translations for, e.g. de_DE,fr_FR"),
            OptionSpec::new("useForm", OptionKind::Bool)
                .default_value(false)
                .describe("Generate a Designer form (.ui) binding"),
            OptionSpec::new("uiUsage", OptionKind::choice(["pointer", "member", "inherit"]))
                .default_value("pointer")
                .describe("How the class holds its form"),
            OptionSpec::new("uiHeaderFile", OptionKind::Text)
                .iff(Condition::All(vec![
                    Condition::equals("useForm", true),
                    Condition::not_equals("uiUsage", "inherit"),
                ]))
                .describe("Generated form header, e.g. ui_widget.h"),
            OptionSpec::new("usePragmaOnce", OptionKind::Bool)
                .default_value(true)
                .describe("Use #pragma once instead of an include guard"),
            OptionSpec::new("includeGuardToken", OptionKind::Identifier)
                .iff(Condition::equals("usePragmaOnce", false))
                .describe("Include guard macro, e.g. WIDGET_H"),
        ]))
        .file(FileTemplate::new("qwidget/main.cpp", "main.cpp", QWIDGET_MAIN_CPP))
        .file(FileTemplate::new("qwidget/widget.h", "{{ headerFile }}", QWIDGET_HEADER))
        .file(FileTemplate::new("qwidget/widget.cpp", "{{ sourceFile }}", QWIDGET_SOURCE))
        .file(
            FileTemplate::new(
                "qwidget/translations.qrc",
                "translations.qrc",
                QWIDGET_TRANSLATIONS,
            )
            .when(Condition::equals("useTranslation", true)),
        )
        .build()
}

// ── Catalog adapter ──────────────────────────────────────────────────────────

/// Catalog over the embedded variants.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self
    }

    fn variants() -> ScaffoldResult<&'static [Variant]> {
        match &*BUILTIN {
            Ok(variants) => Ok(variants.as_slice()),
            Err(e) => Err(ApplicationError::CatalogUnavailable {
                reason: format!("built-in catalog is invalid: {e}"),
            }
            .into()),
        }
    }
}

impl VariantCatalog for BuiltinCatalog {
    fn list(&self) -> ScaffoldResult<Vec<Variant>> {
        Ok(Self::variants()?.to_vec())
    }

    fn find(&self, id: &str) -> ScaffoldResult<Option<Variant>> {
        let found = Self::variants()?.iter().find(|v| v.id.as_str() == id).cloned();
        debug!(id, found = found.is_some(), "builtin catalog lookup");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ships_both_variants_in_id_order() {
        let ids: Vec<String> = BuiltinCatalog::new()
            .list()
            .unwrap()
            .into_iter()
            .map(|v| v.id.to_string())
            .collect();
        assert_eq!(ids, vec!["qtquick", "qwidget"]);
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(BuiltinCatalog::new().find("qml").unwrap().is_none());
    }

    #[test]
    fn qtquick_gates_are_complementary() {
        let quick = qtquick().unwrap();
        assert_eq!(quick.gates.len(), 2);
        for gate in &quick.gates {
            assert!(gate.validate().is_ok(), "{}", gate.name());
        }
    }
}
