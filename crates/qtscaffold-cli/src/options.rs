//! Turning presets, `--set` flags and prompt answers into option values.
//!
//! Values are coerced by the kind the variant declares (`yes` becomes a
//! boolean, `de_DE,fr_FR` a list). Anything deeper, such as identifier
//! syntax or presence rules, is left to the core validator.

use std::collections::BTreeMap;

use qtscaffold_core::domain::{Configuration, OptionKind, OptionSpec, OptionValue, Presence, Schema};
use tracing::debug;

use crate::config::Preset;
use crate::error::{CliError, CliResult};

pub type OptionValues = BTreeMap<String, OptionValue>;

/// Split `key=value`.
pub fn parse_assignment(raw: &str) -> CliResult<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(CliError::invalid_input(format!(
            "'{raw}' is not an assignment; expected KEY=VALUE"
        ))),
    }
}

/// Name the schema uses for `key`, matching case-insensitively.
///
/// Config keys can arrive lowercased from environment sources.
pub fn canonical_name(schema: &Schema, key: &str) -> String {
    schema
        .options()
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(key))
        .map(|spec| spec.name.clone())
        .unwrap_or_else(|| key.to_string())
}

fn parse_bool(option: &str, text: &str) -> CliResult<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(CliError::invalid_input(format!(
            "option '{option}' expects true/false or yes/no, got '{text}'"
        ))),
    }
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerce a raw value to the shape `spec` declares.
pub fn coerce(spec: &OptionSpec, value: OptionValue) -> CliResult<OptionValue> {
    match (&spec.kind, value) {
        (OptionKind::Bool, OptionValue::Text(text)) => {
            parse_bool(&spec.name, &text).map(OptionValue::Bool)
        }
        (OptionKind::List, OptionValue::Text(text)) => Ok(OptionValue::List(split_list(&text))),
        (OptionKind::Bool | OptionKind::List, value) => Ok(value),
        (_, OptionValue::Bool(b)) => Ok(OptionValue::Text(b.to_string())),
        (_, value) => Ok(value),
    }
}

/// `values` plus the schema defaults for every option not yet set.
pub fn effective(schema: &Schema, values: &OptionValues) -> OptionValues {
    let mut merged = values.clone();
    for spec in schema.options() {
        if let Some(default) = &spec.default {
            merged
                .entry(spec.name.clone())
                .or_insert_with(|| default.clone());
        }
    }
    merged
}

/// Whether `spec` must be present given the current values.
pub fn is_required(spec: &OptionSpec, effective: &OptionValues) -> bool {
    match &spec.presence {
        Presence::Required => true,
        Presence::Optional => false,
        Presence::Iff(condition) => condition.evaluate(effective),
    }
}

/// Whether `spec` may be set at all given the current values.
pub fn is_allowed(spec: &OptionSpec, effective: &OptionValues) -> bool {
    match &spec.presence {
        Presence::Iff(condition) => condition.evaluate(effective),
        _ => true,
    }
}

fn class_name(schema: &Schema, values: &OptionValues) -> Option<String> {
    let effective = effective(schema, values);
    effective
        .get("className")
        .or_else(|| effective.get("name"))
        .and_then(OptionValue::as_text)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Conventional value for an option derived from the class name:
/// `<CLASSNAME>_H` for the include guard and `ui_<classname>.h` for the
/// generated form header.
pub fn suggested_value(option: &str, schema: &Schema, values: &OptionValues) -> Option<String> {
    let class = class_name(schema, values)?;
    match option {
        "includeGuardToken" => Some(format!("{}_H", class.to_ascii_uppercase())),
        "uiHeaderFile" => Some(format!("ui_{}.h", class.to_ascii_lowercase())),
        _ => None,
    }
}

/// Fill in options the user did not give but whose conventional value is
/// known, when the schema currently requires them.
pub fn derive_conveniences(schema: &Schema, values: &mut OptionValues) {
    for option in ["includeGuardToken", "uiHeaderFile"] {
        let Some(spec) = schema.option(option) else {
            continue;
        };
        if values.contains_key(option) || !is_required(spec, &effective(schema, values)) {
            continue;
        }
        if let Some(value) = suggested_value(option, schema, values) {
            debug!(option, value = %value, "derived option value");
            values.insert(option.to_string(), OptionValue::Text(value));
        }
    }
}

/// Merge a preset and `--set` assignments, later sources winning.
pub fn resolve(schema: &Schema, preset: Option<&Preset>, sets: &[String]) -> CliResult<OptionValues> {
    let mut values = OptionValues::new();

    if let Some(preset) = preset {
        for (key, value) in &preset.options {
            insert(schema, &mut values, key, value.clone())?;
        }
    }

    for raw in sets {
        let (key, value) = parse_assignment(raw)?;
        insert(schema, &mut values, key, OptionValue::Text(value.to_string()))?;
    }

    Ok(values)
}

fn insert(schema: &Schema, values: &mut OptionValues, key: &str, value: OptionValue) -> CliResult<()> {
    let name = canonical_name(schema, key);
    // Unknown names pass through untouched so the validator can report them.
    let value = match schema.option(&name) {
        Some(spec) => coerce(spec, value)?,
        None => value,
    };
    values.insert(name, value);
    Ok(())
}

pub fn into_configuration(values: OptionValues) -> Configuration {
    values.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtscaffold_adapters::catalog::qwidget;

    fn schema() -> Schema {
        qwidget().unwrap().schema
    }

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(parse_assignment("a=b=c").unwrap(), ("a", "b=c"));
        assert_eq!(parse_assignment("languages=").unwrap(), ("languages", ""));
        assert!(parse_assignment("useForm").is_err());
        assert!(parse_assignment("=true").is_err());
    }

    #[test]
    fn flags_are_coerced_by_kind() {
        let values = resolve(
            &schema(),
            None,
            &[
                "useForm=yes".into(),
                "languages=de_DE, fr_FR".into(),
                "className=Editor".into(),
            ],
        )
        .unwrap();

        assert_eq!(values["useForm"], OptionValue::Bool(true));
        assert_eq!(values["languages"], OptionValue::from(vec!["de_DE", "fr_FR"]));
        assert_eq!(values["className"], OptionValue::from("Editor"));
    }

    #[test]
    fn bad_boolean_is_rejected() {
        assert!(resolve(&schema(), None, &["useForm=maybe".into()]).is_err());
    }

    #[test]
    fn flags_override_preset_and_keys_are_case_insensitive() {
        let preset = Preset {
            variant: "qwidget".into(),
            description: None,
            options: BTreeMap::from([
                ("useform".to_string(), OptionValue::from(true)),
                ("uiusage".to_string(), OptionValue::from("member")),
            ]),
        };
        let values = resolve(&schema(), Some(&preset), &["uiUsage=inherit".into()]).unwrap();
        assert_eq!(values["useForm"], OptionValue::Bool(true));
        assert_eq!(values["uiUsage"], OptionValue::from("inherit"));
        assert!(!values.contains_key("uiusage"));
    }

    #[test]
    fn unknown_keys_pass_through() {
        let values = resolve(&schema(), None, &["colour=blue".into()]).unwrap();
        assert_eq!(values["colour"], OptionValue::from("blue"));
    }

    #[test]
    fn guard_token_is_derived_only_in_guard_mode() {
        let mut values: OptionValues = BTreeMap::from([
            ("name".to_string(), OptionValue::from("notes")),
            ("className".to_string(), OptionValue::from("MainWindow")),
        ]);
        derive_conveniences(&schema(), &mut values);
        assert!(!values.contains_key("includeGuardToken"));

        values.insert("usePragmaOnce".into(), OptionValue::Bool(false));
        derive_conveniences(&schema(), &mut values);
        assert_eq!(values["includeGuardToken"], OptionValue::from("MAINWINDOW_H"));
    }

    #[test]
    fn form_header_follows_default_class_name() {
        let mut values: OptionValues = BTreeMap::from([
            ("name".to_string(), OptionValue::from("notes")),
            ("useForm".to_string(), OptionValue::Bool(true)),
        ]);
        derive_conveniences(&schema(), &mut values);
        assert_eq!(values["uiHeaderFile"], OptionValue::from("ui_widget.h"));
    }

    #[test]
    fn inherited_form_needs_no_header() {
        let mut values: OptionValues = BTreeMap::from([
            ("name".to_string(), OptionValue::from("notes")),
            ("useForm".to_string(), OptionValue::Bool(true)),
            ("uiUsage".to_string(), OptionValue::from("inherit")),
        ]);
        derive_conveniences(&schema(), &mut values);
        assert!(!values.contains_key("uiHeaderFile"));
    }

    #[test]
    fn explicit_header_is_kept() {
        let mut values: OptionValues = BTreeMap::from([
            ("name".to_string(), OptionValue::from("notes")),
            ("useForm".to_string(), OptionValue::Bool(true)),
            ("uiHeaderFile".to_string(), OptionValue::from("ui_form.h")),
        ]);
        derive_conveniences(&schema(), &mut values);
        assert_eq!(values["uiHeaderFile"], OptionValue::from("ui_form.h"));
    }
}
