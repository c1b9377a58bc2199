//! Per-variant option schema and the configuration validator.
//!
//! Presence rules are data ([`Presence`] and [`Condition`]), so a variant
//! states "`includeGuardToken` exists exactly when `usePragmaOnce` is false"
//! once, in its schema, and every file template inherits that guarantee.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, instrument};

use super::config::{Configuration, OptionValue};
use super::error::ConfigError;
use super::version::QtVersion;
use crate::error::ScaffoldResult;

// ── Kinds ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Text,
    /// A C++ identifier: `[A-Za-z_][A-Za-z0-9_]*`.
    Identifier,
    Version,
    Choice(Vec<String>),
    List,
}

impl OptionKind {
    pub fn choice<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(values.into_iter().map(Into::into).collect())
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Bool => "a boolean".into(),
            Self::Text => "text".into(),
            Self::Identifier => "an identifier".into(),
            Self::Version => "a version".into(),
            Self::Choice(values) => format!("one of {}", values.join("/")),
            Self::List => "a list".into(),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Text => f.write_str("text"),
            Self::Identifier => f.write_str("identifier"),
            Self::Version => f.write_str("version"),
            Self::Choice(values) => write!(f, "choice({})", values.join("|")),
            Self::List => f.write_str("list"),
        }
    }
}

// ── Conditions ───────────────────────────────────────────────────────────────

/// A predicate over option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Equals { option: String, value: OptionValue },
    NotEquals { option: String, value: OptionValue },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn equals(option: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self::Equals {
            option: option.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(option: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self::NotEquals {
            option: option.into(),
            value: value.into(),
        }
    }

    /// Evaluate against a set of values.
    ///
    /// An absent option equals nothing, so `Equals` is false and `NotEquals`
    /// is true for it.
    pub fn evaluate(&self, values: &BTreeMap<String, OptionValue>) -> bool {
        match self {
            Self::Equals { option, value } => values.get(option) == Some(value),
            Self::NotEquals { option, value } => values.get(option) != Some(value),
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(values)),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(values)),
            Self::Not(inner) => !inner.evaluate(values),
        }
    }

    /// Evaluate against validated values.
    pub fn holds_for(&self, config: &ValidatedConfig) -> bool {
        self.evaluate(&config.raw)
    }

    /// Every option name the condition reads.
    pub fn options(&self) -> Vec<&str> {
        match self {
            Self::Equals { option, .. } | Self::NotEquals { option, .. } => vec![option],
            Self::All(conditions) | Self::Any(conditions) => {
                conditions.iter().flat_map(Condition::options).collect()
            }
            Self::Not(inner) => inner.options(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, items: &[Condition], sep: &str| {
            for (i, c) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(sep)?;
                }
                write!(f, "({c})")?;
            }
            Ok(())
        };
        match self {
            Self::Equals { option, value } => write!(f, "{option} is {value}"),
            Self::NotEquals { option, value } => write!(f, "{option} is not {value}"),
            Self::All(items) => join(f, items, " and "),
            Self::Any(items) => join(f, items, " or "),
            Self::Not(inner) => write!(f, "not ({inner})"),
        }
    }
}

// ── Option specs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Required when the condition holds, forbidden otherwise.
    Iff(Condition),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: String,
    pub kind: OptionKind,
    pub presence: Presence,
    pub default: Option<OptionValue>,
    pub description: String,
}

impl OptionSpec {
    /// An optional option with no default.
    pub fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            presence: Presence::Optional,
            default: None,
            description: String::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn iff(mut self, condition: Condition) -> Self {
        self.presence = Presence::Iff(condition);
        self
    }

    pub fn default_value(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ── Schema ───────────────────────────────────────────────────────────────────

/// The ordered option declarations of one variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    options: Vec<OptionSpec>,
}

impl Schema {
    pub fn new(options: Vec<OptionSpec>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.option(name).is_some()
    }

    /// Validate `config` for `variant`, returning the first problem found.
    ///
    /// Order: unknown options, defaults, presence rules, kinds.
    #[instrument(skip_all, fields(variant = %variant))]
    pub fn validate(&self, variant: &str, config: &Configuration) -> ScaffoldResult<ValidatedConfig> {
        for (name, _) in config.iter() {
            if !self.declares(name) {
                return Err(ConfigError::UnknownOption {
                    variant: variant.to_string(),
                    option: name.to_string(),
                }
                .into());
            }
        }

        let mut raw: BTreeMap<String, OptionValue> = config
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        for spec in &self.options {
            if let Some(default) = &spec.default {
                raw.entry(spec.name.clone()).or_insert_with(|| default.clone());
            }
        }

        for spec in &self.options {
            let present = raw.contains_key(&spec.name);
            match &spec.presence {
                Presence::Required if !present => {
                    return Err(ConfigError::MissingOption {
                        variant: variant.to_string(),
                        option: spec.name.clone(),
                        reason: "it is required".into(),
                    }
                    .into());
                }
                Presence::Iff(condition) => {
                    let holds = condition.evaluate(&raw);
                    if holds && !present {
                        return Err(ConfigError::MissingOption {
                            variant: variant.to_string(),
                            option: spec.name.clone(),
                            reason: format!("required when {condition}"),
                        }
                        .into());
                    }
                    if !holds && present {
                        return Err(ConfigError::UnexpectedOption {
                            variant: variant.to_string(),
                            option: spec.name.clone(),
                            reason: format!("only allowed when {condition}"),
                        }
                        .into());
                    }
                }
                _ => {}
            }
        }

        let mut values = BTreeMap::new();
        for spec in &self.options {
            if let Some(value) = raw.get(&spec.name) {
                let typed = check_kind(variant, spec, value)?;
                values.insert(spec.name.clone(), typed);
            }
        }

        debug!(options = values.len(), "configuration validated");

        Ok(ValidatedConfig {
            variant: variant.to_string(),
            values,
            raw,
        })
    }
}

fn check_kind(variant: &str, spec: &OptionSpec, value: &OptionValue) -> ScaffoldResult<TypedValue> {
    let mismatch = || ConfigError::TypeMismatch {
        variant: variant.to_string(),
        option: spec.name.clone(),
        expected: spec.kind.describe(),
        found: value.kind_name().to_string(),
    };
    let empty = || ConfigError::EmptyValue {
        variant: variant.to_string(),
        option: spec.name.clone(),
    };

    let typed = match (&spec.kind, value) {
        (OptionKind::Bool, OptionValue::Bool(b)) => TypedValue::Bool(*b),
        (OptionKind::Text, OptionValue::Text(s)) => {
            if s.trim().is_empty() {
                return Err(empty().into());
            }
            TypedValue::Text(s.clone())
        }
        (OptionKind::Identifier, OptionValue::Text(s)) => {
            if s.is_empty() {
                return Err(empty().into());
            }
            if !is_identifier(s) {
                return Err(ConfigError::InvalidIdentifier {
                    variant: variant.to_string(),
                    option: spec.name.clone(),
                    value: s.clone(),
                }
                .into());
            }
            TypedValue::Text(s.clone())
        }
        (OptionKind::Version, OptionValue::Text(s)) => TypedValue::Version(QtVersion::parse(s)?),
        (OptionKind::Choice(allowed), OptionValue::Text(s)) => {
            if !allowed.iter().any(|a| a == s) {
                return Err(ConfigError::InvalidChoice {
                    variant: variant.to_string(),
                    option: spec.name.clone(),
                    value: s.clone(),
                    allowed: allowed.clone(),
                }
                .into());
            }
            TypedValue::Text(s.clone())
        }
        (OptionKind::List, OptionValue::List(items)) => {
            if items.is_empty() || items.iter().any(|i| i.trim().is_empty()) {
                return Err(empty().into());
            }
            TypedValue::List(items.clone())
        }
        _ => return Err(mismatch().into()),
    };
    Ok(typed)
}

/// `[A-Za-z_][A-Za-z0-9_]*`, excluding C++ keywords.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_keyword(s)
}

/// Reserved words of C++20, alternative operator spellings included.
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "co_await",
    "co_return", "co_yield", "compl", "concept", "const", "const_cast", "consteval",
    "constexpr", "constinit", "continue", "decltype", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept",
    "not", "not_eq", "nullptr", "operator", "or", "or_eq", "private", "protected", "public",
    "register", "reinterpret_cast", "requires", "return", "short", "signed", "sizeof",
    "static", "static_assert", "static_cast", "struct", "switch", "template", "this",
    "thread_local", "throw", "true", "try", "typedef", "typeid", "typename", "union",
    "unsigned", "using", "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Whether `s` is a reserved C++ word.
pub fn is_keyword(s: &str) -> bool {
    CPP_KEYWORDS.contains(&s)
}

// ── Validated configuration ──────────────────────────────────────────────────

/// A value that passed its kind check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Bool(bool),
    Text(String),
    Version(QtVersion),
    List(Vec<String>),
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
            Self::Version(v) => write!(f, "{v}"),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Configuration that satisfied a variant's schema, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    variant: String,
    values: BTreeMap<String, TypedValue>,
    raw: BTreeMap<String, OptionValue>,
}

impl ValidatedConfig {
    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.values.get(name)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            TypedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn version(&self, name: &str) -> Option<&QtVersion> {
        match self.values.get(name)? {
            TypedValue::Version(v) => Some(v),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name)? {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
