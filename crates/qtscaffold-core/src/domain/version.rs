//! Structured platform versions and version gates.
//!
//! A minimum platform version like `6.10` must order *after* `6.5`. Treating
//! it as the float `6.1` gets that wrong, so every comparison here goes
//! through [`semver::Version`] and compares components as integers.
//!
//! A [`GateFamily`] is a named set of mutually exclusive branches, e.g.
//!
//! ```text
//! qmlLoading:    url    if < 6.5
//!                module if >= 6.5
//! ```
//!
//! Evaluating a family always yields exactly one branch label, or an error.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, VersionParseError};

// ── QtVersion ────────────────────────────────────────────────────────────────

/// A platform version with component-wise ordering.
///
/// Accepts `MAJOR`, `MAJOR.MINOR` and `MAJOR.MINOR.PATCH`; missing components
/// are zero. The text the user typed is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QtVersion {
    inner: semver::Version,
    text: String,
}

impl QtVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            inner: semver::Version::new(major, minor, patch),
            text: format!("{major}.{minor}.{patch}"),
        }
    }

    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let text = input.trim();
        let err = |reason: &str| VersionParseError {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Err(err("empty version"));
        }

        // Full semver (with pre-release/build metadata) is accepted as-is.
        if let Ok(inner) = semver::Version::parse(text) {
            return Ok(Self {
                inner,
                text: text.to_string(),
            });
        }

        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() > 3 {
            return Err(err("expected at most three components"));
        }
        for part in &parts {
            if part.is_empty() {
                return Err(err("empty version component"));
            }
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err("version components must be digits"));
            }
        }

        let mut padded = parts.clone();
        padded.resize(3, "0");
        let inner = semver::Version::parse(&padded.join(".")).map_err(|e| err(&e.to_string()))?;

        Ok(Self {
            inner,
            text: text.to_string(),
        })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Versions immediately around `self`, used to sample gate families.
    fn neighbours(&self) -> Vec<QtVersion> {
        let (major, minor, patch) = (self.major(), self.minor(), self.patch());
        let mut out = vec![QtVersion::new(major, minor, patch.saturating_add(1))];
        if patch > 0 {
            out.push(QtVersion::new(major, minor, patch - 1));
        } else if minor > 0 {
            out.push(QtVersion::new(major, minor - 1, u64::from(u32::MAX)));
        } else if major > 0 {
            out.push(QtVersion::new(
                major - 1,
                u64::from(u32::MAX),
                u64::from(u32::MAX),
            ));
        }
        out
    }
}

impl PartialEq for QtVersion {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for QtVersion {}

impl Hash for QtVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl PartialOrd for QtVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QtVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl fmt::Display for QtVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for QtVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for QtVersion {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QtVersion> for String {
    fn from(value: QtVersion) -> Self {
        value.text
    }
}

// ── Predicates ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Comparison {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
            Self::Eq => ordering == Ordering::Equal,
        }
    }
}

/// `version <op> threshold`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPredicate {
    pub op: Comparison,
    pub threshold: QtVersion,
}

impl VersionPredicate {
    pub fn new(op: Comparison, threshold: QtVersion) -> Self {
        Self { op, threshold }
    }

    pub fn lt(threshold: QtVersion) -> Self {
        Self::new(Comparison::Lt, threshold)
    }

    pub fn ge(threshold: QtVersion) -> Self {
        Self::new(Comparison::Ge, threshold)
    }

    pub fn matches(&self, version: &QtVersion) -> bool {
        self.op.holds(version.cmp(&self.threshold))
    }
}

impl fmt::Display for VersionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op.symbol(), self.threshold)
    }
}

impl FromStr for VersionPredicate {
    type Err = VersionParseError;

    /// Parse `"<6.5"`, `">= 6.4"`, `"==6.5"` or `"=6.5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Two-character operators first so "<=" is not read as "<".
        let (op, rest) = [
            ("<=", Comparison::Le),
            (">=", Comparison::Ge),
            ("==", Comparison::Eq),
            ("<", Comparison::Lt),
            (">", Comparison::Gt),
            ("=", Comparison::Eq),
        ]
        .iter()
        .find_map(|(sym, op)| s.strip_prefix(sym).map(|rest| (*op, rest)))
        .ok_or_else(|| VersionParseError {
            input: s.to_string(),
            reason: "expected a comparison operator (<, <=, >, >=, ==)".into(),
        })?;

        Ok(Self::new(op, QtVersion::parse(rest)?))
    }
}

// ── Gate families ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateBranch {
    pub label: String,
    pub predicate: VersionPredicate,
}

/// Mutually exclusive version-threshold branches over one version option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateFamily {
    name: String,
    option: String,
    branches: Vec<GateBranch>,
}

impl GateFamily {
    /// Start a family named `name` that reads the version option `option`.
    pub fn new(name: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            option: option.into(),
            branches: Vec::new(),
        }
    }

    pub fn branch(mut self, label: impl Into<String>, predicate: VersionPredicate) -> Self {
        self.branches.push(GateBranch {
            label: label.into(),
            predicate,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn option(&self) -> &str {
        &self.option
    }

    pub fn branches(&self) -> &[GateBranch] {
        &self.branches
    }

    /// Select the single branch whose predicate holds for `version`.
    pub fn select(&self, version: &QtVersion) -> Result<&str, DomainError> {
        let mut matching = self
            .branches
            .iter()
            .filter(|b| b.predicate.matches(version))
            .map(|b| b.label.as_str());

        match (matching.next(), matching.next()) {
            (Some(label), None) => Ok(label),
            (None, _) => Err(DomainError::GateNoBranch {
                family: self.name.clone(),
                version: version.to_string(),
            }),
            (Some(first), Some(second)) => {
                let mut labels = vec![first.to_string(), second.to_string()];
                labels.extend(matching.map(str::to_string));
                Err(DomainError::GateAmbiguous {
                    family: self.name.clone(),
                    version: version.to_string(),
                    labels,
                })
            }
        }
    }

    /// Check the family is exhaustive and exclusive.
    ///
    /// Samples every threshold and its neighbours plus both extremes; each sample
    /// must select exactly one branch.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.branches.is_empty() {
            return Err(DomainError::InvalidGate {
                family: self.name.clone(),
                reason: "no branches".into(),
            });
        }

        let mut labels = std::collections::HashSet::new();
        for branch in &self.branches {
            if !labels.insert(branch.label.as_str()) {
                return Err(DomainError::InvalidGate {
                    family: self.name.clone(),
                    reason: format!("duplicate label '{}'", branch.label),
                });
            }
        }

        let mut samples = vec![
            QtVersion::new(0, 0, 0),
            QtVersion::new(u64::from(u32::MAX), 0, 0),
        ];
        for branch in &self.branches {
            samples.push(branch.predicate.threshold.clone());
            samples.extend(branch.predicate.threshold.neighbours());
        }

        for sample in &samples {
            self.select(sample)?;
        }
        Ok(())
    }
}
