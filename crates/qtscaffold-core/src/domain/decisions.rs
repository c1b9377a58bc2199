//! Cross-file decisions, computed once per render pass.
//!
//! Options such as `usePragmaOnce` or `uiUsage` shape several files at once.
//! Templates never read them directly; they branch on the resolved decision
//! instead (`guard.pragmaOnce`, `ui.shape`, `gate.qmlLoading`), so header and
//! source can't disagree.

use std::collections::{BTreeMap, BTreeSet};

use super::context::{ContextValue, RenderContext};
use super::error::DomainError;
use super::schema::{TypedValue, ValidatedConfig};
use super::variant::Variant;

/// Options consumed by decisions, with the decision that replaces them.
pub const DECISION_INPUTS: &[(&str, &str)] = &[
    ("usePragmaOnce", "guard"),
    ("includeGuardToken", "guard"),
    ("useForm", "ui"),
    ("uiUsage", "ui"),
    ("uiHeaderFile", "ui"),
];

/// Per-file name exposed alongside the shared context.
pub const FILE_NAME: &str = "fileName";

/// Context names derived from a single option.
const DERIVED_NAMES: &[(&str, &str)] = &[("headerFile", "className"), ("sourceFile", "className")];

/// Option a context name is derived from; plain options map to themselves.
pub fn source_option<'a>(variant: &'a Variant, name: &'a str) -> Option<&'a str> {
    if let Some((_, option)) = DERIVED_NAMES.iter().find(|(derived, _)| *derived == name) {
        return variant.schema.declares(option).then_some(*option);
    }
    variant.schema.declares(name).then_some(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardStyle {
    pub pragma_once: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiShape {
    None,
    Pointer,
    Member,
    Inherit,
}

impl UiShape {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pointer => "pointer",
            Self::Member => "member",
            Self::Inherit => "inherit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiDecision {
    pub shape: UiShape,
    pub header: Option<String>,
}

/// Everything decided once for a render pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SharedDecisions {
    pub guard: Option<GuardStyle>,
    pub ui: Option<UiDecision>,
    /// Gate family name to selected branch label.
    pub gates: BTreeMap<String, String>,
    pub header_file: Option<String>,
    pub source_file: Option<String>,
}

impl SharedDecisions {
    pub fn compute(variant: &Variant, config: &ValidatedConfig) -> Result<Self, DomainError> {
        let schema = &variant.schema;
        let class_lower = config.text("className").map(str::to_lowercase);

        let guard = schema.declares("usePragmaOnce").then(|| GuardStyle {
            pragma_once: config.bool("usePragmaOnce").unwrap_or(true),
            token: config.text("includeGuardToken").map(str::to_string),
        });

        let ui = schema.declares("useForm").then(|| {
            let shape = if config.bool("useForm").unwrap_or(false) {
                match config.text("uiUsage") {
                    Some("member") => UiShape::Member,
                    Some("inherit") => UiShape::Inherit,
                    _ => UiShape::Pointer,
                }
            } else {
                UiShape::None
            };
            let header = match shape {
                UiShape::None => None,
                UiShape::Pointer | UiShape::Member => {
                    config.text("uiHeaderFile").map(str::to_string)
                }
                UiShape::Inherit => class_lower.as_ref().map(|c| format!("ui_{c}.h")),
            };
            UiDecision { shape, header }
        });

        let mut gates = BTreeMap::new();
        for family in &variant.gates {
            let version = config
                .version(family.option())
                .ok_or_else(|| DomainError::InvalidGate {
                    family: family.name().to_string(),
                    reason: format!("no value for '{}'", family.option()),
                })?;
            gates.insert(family.name().to_string(), family.select(version)?.to_string());
        }

        Ok(Self {
            guard,
            ui,
            gates,
            header_file: class_lower.as_ref().map(|c| format!("{c}.h")),
            source_file: class_lower.as_ref().map(|c| format!("{c}.cpp")),
        })
    }

    /// Build the shared context: plain options plus decisions.
    pub fn render_context(&self, variant: &Variant, config: &ValidatedConfig) -> RenderContext {
        let hidden = decision_inputs(variant);
        let mut ctx = RenderContext::new();

        for (name, value) in config.iter() {
            if hidden.contains_key(name) {
                continue;
            }
            let value = match value {
                TypedValue::Bool(b) => ContextValue::Bool(*b),
                TypedValue::Text(s) => ContextValue::Text(s.clone()),
                TypedValue::Version(v) => ContextValue::Text(v.to_string()),
                TypedValue::List(items) => ContextValue::List(items.clone()),
            };
            ctx.insert(name, value);
        }

        if let Some(guard) = &self.guard {
            let mut map = BTreeMap::from([(
                "pragmaOnce".to_string(),
                ContextValue::Bool(guard.pragma_once),
            )]);
            if let Some(token) = &guard.token {
                map.insert("token".into(), ContextValue::Text(token.clone()));
            }
            ctx.insert("guard", ContextValue::Map(map));
        }

        if let Some(ui) = &self.ui {
            let mut map = BTreeMap::from([
                ("shape".to_string(), ContextValue::from(ui.shape.as_str())),
                ("form".to_string(), ContextValue::Bool(ui.shape != UiShape::None)),
            ]);
            if let Some(header) = &ui.header {
                map.insert("header".into(), ContextValue::Text(header.clone()));
            }
            ctx.insert("ui", ContextValue::Map(map));
        }

        if !self.gates.is_empty() {
            let map = self
                .gates
                .iter()
                .map(|(k, v)| (k.clone(), ContextValue::Text(v.clone())))
                .collect();
            ctx.insert("gate", ContextValue::Map(map));
        }

        if let Some(header) = &self.header_file {
            ctx.insert("headerFile", header.as_str());
        }
        if let Some(source) = &self.source_file {
            ctx.insert("sourceFile", source.as_str());
        }

        ctx
    }
}

/// Decision inputs of `variant`: option name to the decision that replaces it.
pub fn decision_inputs(variant: &Variant) -> BTreeMap<&str, &'static str> {
    let mut inputs: BTreeMap<&str, &'static str> = DECISION_INPUTS
        .iter()
        .filter(|(option, _)| variant.schema.declares(option))
        .map(|(option, decision)| (*option, *decision))
        .collect();
    for family in &variant.gates {
        inputs.insert(family.option(), "gate");
    }
    inputs
}

/// Top-level names decisions add to the context of `variant`.
pub fn provided_names(variant: &Variant) -> BTreeSet<&'static str> {
    let schema = &variant.schema;
    let mut names = BTreeSet::from([FILE_NAME]);
    if schema.declares("usePragmaOnce") {
        names.insert("guard");
    }
    if schema.declares("useForm") {
        names.insert("ui");
    }
    if !variant.gates.is_empty() {
        names.insert("gate");
    }
    if schema.declares("className") {
        names.insert("headerFile");
        names.insert("sourceFile");
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::Configuration;
    use crate::domain::schema::{Condition, OptionKind, OptionSpec, Schema};
    use crate::domain::variant::FileTemplate;
    use crate::domain::version::{GateFamily, QtVersion, VersionPredicate};

    fn widget_variant() -> Variant {
        Variant::builder()
            .id("qwidget")
            .schema(Schema::new(vec![
                OptionSpec::new("name", OptionKind::Identifier).required(),
                OptionSpec::new("className", OptionKind::Identifier).default_value("Widget"),
                OptionSpec::new("useForm", OptionKind::Bool).default_value(false),
                OptionSpec::new("uiUsage", OptionKind::choice(["pointer", "member", "inherit"]))
                    .default_value("pointer"),
                OptionSpec::new("uiHeaderFile", OptionKind::Text).iff(Condition::All(vec![
                    Condition::equals("useForm", true),
                    Condition::not_equals("uiUsage", "inherit"),
                ])),
                OptionSpec::new("usePragmaOnce", OptionKind::Bool).default_value(true),
                OptionSpec::new("includeGuardToken", OptionKind::Identifier)
                    .iff(Condition::equals("usePragmaOnce", false)),
            ]))
            .file(FileTemplate::new("qwidget/widget.h", "{{ headerFile }}", "class X;"))
            .build()
            .unwrap()
    }

    fn quick_variant() -> Variant {
        Variant::builder()
            .id("qtquick")
            .schema(Schema::new(vec![
                OptionSpec::new("name", OptionKind::Identifier).required(),
                OptionSpec::new("minimumQtVersion", OptionKind::Version).default_value("6.8"),
            ]))
            .gate(
                GateFamily::new("qmlLoading", "minimumQtVersion")
                    .branch("url", VersionPredicate::lt(QtVersion::new(6, 5, 0)))
                    .branch("module", VersionPredicate::ge(QtVersion::new(6, 5, 0))),
            )
            .file(FileTemplate::new("qtquick/main.cpp", "main.cpp", "int main() {}"))
            .build()
            .unwrap()
    }

    fn decide(variant: &Variant, config: Configuration) -> (SharedDecisions, RenderContext) {
        let validated = variant.schema.validate(variant.id.as_str(), &config).unwrap();
        let decisions = SharedDecisions::compute(variant, &validated).unwrap();
        let ctx = decisions.render_context(variant, &validated);
        (decisions, ctx)
    }

    #[test]
    fn inherit_derives_ui_header_from_class_name() {
        let (decisions, _) = decide(
            &widget_variant(),
            Configuration::builder()
                .set("name", "app")
                .set("className", "MainWindow")
                .set("useForm", true)
                .set("uiUsage", "inherit")
                .build(),
        );
        let ui = decisions.ui.unwrap();
        assert_eq!(ui.shape, UiShape::Inherit);
        assert_eq!(ui.header.as_deref(), Some("ui_mainwindow.h"));
        assert_eq!(decisions.header_file.as_deref(), Some("mainwindow.h"));
        assert_eq!(decisions.source_file.as_deref(), Some("mainwindow.cpp"));
    }

    #[test]
    fn no_form_means_no_shape() {
        let (decisions, ctx) = decide(
            &widget_variant(),
            Configuration::builder().set("name", "app").build(),
        );
        assert_eq!(decisions.ui.unwrap().shape, UiShape::None);
        assert_eq!(ctx.lookup("ui.form").and_then(ContextValue::as_bool), Some(false));
        assert!(ctx.lookup("ui.header").is_none());
    }

    #[test]
    fn decision_inputs_are_hidden_from_context() {
        let (_, ctx) = decide(
            &widget_variant(),
            Configuration::builder()
                .set("name", "app")
                .set("usePragmaOnce", false)
                .set("includeGuardToken", "WIDGET_H")
                .build(),
        );

        for (option, _) in DECISION_INPUTS {
            assert!(ctx.get(option).is_none(), "{option} leaked into context");
        }
        assert_eq!(ctx.lookup("guard.token").and_then(ContextValue::as_text), Some("WIDGET_H"));
        assert_eq!(ctx.get("className").and_then(ContextValue::as_text), Some("Widget"));
    }

    #[test]
    fn gates_resolve_once_and_hide_their_input() {
        let variant = quick_variant();
        let (decisions, ctx) = decide(
            &variant,
            Configuration::builder()
                .set("name", "app")
                .set("minimumQtVersion", "6.10")
                .build(),
        );
        assert_eq!(decisions.gates["qmlLoading"], "module");
        assert!(ctx.get("minimumQtVersion").is_none());
        assert_eq!(decision_inputs(&variant).get("minimumQtVersion"), Some(&"gate"));
        assert!(provided_names(&variant).contains("gate"));
        assert!(!provided_names(&variant).contains("guard"));
    }
}
