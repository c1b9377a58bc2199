//! Raw, untyped configuration as supplied by the caller.
//!
//! A [`Configuration`] is just named values. It carries no knowledge of any
//! variant; [`Schema::validate`](super::Schema::validate) turns it into a
//! [`ValidatedConfig`](super::ValidatedConfig).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Human name of the value's shape, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "a boolean",
            Self::Text(_) => "text",
            Self::List(_) => "a list",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Immutable mapping from option name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<String, OptionValue>,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A copy with `other`'s values layered on top.
    pub fn merged_with(&self, other: &Configuration) -> Configuration {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Configuration { values }
    }
}

impl FromIterator<(String, OptionValue)> for Configuration {
    fn from_iter<T: IntoIterator<Item = (String, OptionValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    values: BTreeMap<String, OptionValue>,
}

impl ConfigurationBuilder {
    pub fn set(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Set only when nothing is set yet under `name`.
    pub fn set_default(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.values.entry(name.into()).or_insert_with(|| value.into());
        self
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn build(self) -> Configuration {
        Configuration {
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_last_value() {
        let config = Configuration::builder()
            .set("name", "first")
            .set("name", "second")
            .set("useForm", true)
            .build();

        assert_eq!(config.get("name"), Some(&OptionValue::from("second")));
        assert_eq!(config.get("useForm").and_then(OptionValue::as_bool), Some(true));
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn set_default_does_not_override() {
        let config = Configuration::builder()
            .set("className", "MainWindow")
            .set_default("className", "Widget")
            .build();
        assert_eq!(config.get("className").and_then(OptionValue::as_text), Some("MainWindow"));
    }

    #[test]
    fn merged_with_prefers_right_hand_side() {
        let preset = Configuration::builder()
            .set("useForm", true)
            .set("uiUsage", "member")
            .build();
        let explicit = Configuration::builder().set("uiUsage", "inherit").build();

        let merged = preset.merged_with(&explicit);
        assert_eq!(merged.get("useForm"), Some(&OptionValue::Bool(true)));
        assert_eq!(merged.get("uiUsage"), Some(&OptionValue::from("inherit")));
    }

    #[test]
    fn untagged_deserialization() {
        let value: OptionValue = serde_json::from_str(r#"["de", "fr"]"#).unwrap();
        assert_eq!(value, OptionValue::from(vec!["de", "fr"]));
    }
}
