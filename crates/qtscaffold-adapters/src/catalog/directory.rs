//! Filesystem-based variant catalog.
//!
//! Discovers `variant.toml` manifests under a directory and turns them into
//! domain [`Variant`]s. The catalog is read once at construction and never
//! written.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── qwidget-dialog/
//! │   ├── variant.toml         ← manifest (required)
//! │   ├── main.cpp.j2
//! │   └── dialog.h.j2
//! └── qtquick-kiosk/
//!     ├── variant.toml
//!     └── main.cpp.j2
//! ```
//!
//! # `variant.toml` format
//!
//! ```toml
//! [variant]
//! id = "qwidget-dialog"
//! title = "Dialog application"          # optional
//! description = "..."                   # optional
//!
//! [[options]]
//! name = "name"
//! kind = "identifier"      # bool | text | identifier | version | list | choice
//! presence = "required"    # required | optional (default) | iff
//! default = "Dialog"       # optional
//! choices = ["a", "b"]     # kind = "choice" only
//! when = { option = "useForm", equals = true }   # presence = "iff" only
//!
//! [[gates]]
//! name = "qmlLoading"
//! option = "minimumQtVersion"
//! branches = { url = "<6.5", module = ">=6.5" }
//!
//! [[files]]
//! in = "main.cpp.j2"       # body, relative to the manifest
//! out = "main.cpp"         # output path pattern; defaults to the file name of `in`
//! when = { option = "useTranslation", equals = true }   # optional
//!
//! [[files]]
//! in = "assets/Logo.qml"
//! bypass = true            # copy the body without rendering it
//! ```
//!
//! Conditions are tables: `{ option, equals }`, `{ option, not_equals }`,
//! `{ all = [...] }`, `{ any = [...] }` or `{ not = {...} }`.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use qtscaffold_core::{
    application::{
        ApplicationError, VariantRenderer,
        ports::{TemplateEngine, VariantCatalog},
    },
    domain::{
        Condition, DomainError, FileTemplate, GateFamily, OptionKind, OptionSpec, OptionValue,
        RelativePath, Schema, Variant, VersionPredicate,
    },
    error::{ScaffoldError, ScaffoldResult},
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

pub const MANIFEST_FILE: &str = "variant.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `variant.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct VariantManifest {
    pub variant: VariantSection,
    #[serde(default)]
    pub options: Vec<OptionEntry>,
    #[serde(default)]
    pub gates: Vec<GateEntry>,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VariantSection {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KindEntry {
    Bool,
    Text,
    Identifier,
    Version,
    List,
    Choice,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PresenceEntry {
    Required,
    #[default]
    Optional,
    Iff,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OptionEntry {
    pub name: String,
    pub kind: KindEntry,
    #[serde(default)]
    pub presence: PresenceEntry,
    pub default: Option<OptionValue>,
    pub choices: Option<Vec<String>>,
    pub when: Option<ConditionEntry>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum ConditionEntry {
    Equals {
        option: String,
        equals: OptionValue,
    },
    NotEquals {
        option: String,
        not_equals: OptionValue,
    },
    All {
        all: Vec<ConditionEntry>,
    },
    Any {
        any: Vec<ConditionEntry>,
    },
    Not {
        not: Box<ConditionEntry>,
    },
}

impl From<ConditionEntry> for Condition {
    fn from(entry: ConditionEntry) -> Self {
        match entry {
            ConditionEntry::Equals { option, equals } => Condition::equals(option, equals),
            ConditionEntry::NotEquals { option, not_equals } => {
                Condition::not_equals(option, not_equals)
            }
            ConditionEntry::All { all } => Condition::All(all.into_iter().map(Into::into).collect()),
            ConditionEntry::Any { any } => Condition::Any(any.into_iter().map(Into::into).collect()),
            ConditionEntry::Not { not } => Condition::Not(Box::new((*not).into())),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GateEntry {
    pub name: String,
    pub option: String,
    /// Label to predicate, e.g. `url = "<6.5"`.
    pub branches: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FileEntry {
    #[serde(rename = "in")]
    pub input: String,
    pub out: Option<String>,
    pub when: Option<ConditionEntry>,
    #[serde(default)]
    pub bypass: bool,
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Variants loaded from a directory of manifests.
///
/// Manifests that are missing, malformed, or fail the consistency checks are
/// skipped with a `WARN` log; they do not prevent other variants loading.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
    variants: Vec<Variant>,
}

impl DirectoryCatalog {
    /// Load every valid variant under `root`.
    ///
    /// `engine` is used to check template references; the catalog does not
    /// keep it.
    #[instrument(skip_all, fields(dir = %root.as_ref().display()))]
    pub fn load(root: impl AsRef<Path>, engine: &dyn TemplateEngine) -> ScaffoldResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ApplicationError::CatalogUnavailable {
                reason: format!("templates directory not found: {}", root.display()),
            }
            .into());
        }

        let mut manifests: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .max_depth(2)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && e.file_name() == MANIFEST_FILE)
            .map(|e| e.into_path())
            .collect();
        manifests.sort();

        let renderer = VariantRenderer::new(engine);
        let mut variants: Vec<Variant> = Vec::new();

        for manifest in manifests {
            let loaded = load_manifest(&manifest).map_err(ScaffoldError::from).and_then(|v| {
                renderer.check_variant(&v)?;
                Ok(v)
            });

            match loaded {
                Ok(variant) if variants.iter().any(|v| v.id == variant.id) => {
                    warn!(id = %variant.id, path = %manifest.display(), "duplicate variant id, skipping");
                }
                Ok(variant) => {
                    debug!(id = %variant.id, "loaded variant");
                    variants.push(variant);
                }
                Err(e) => {
                    warn!(path = %manifest.display(), error = %e, "skipping invalid variant manifest");
                }
            }
        }

        variants.sort_by(|a, b| a.id.cmp(&b.id));
        info!(count = variants.len(), "directory catalog loaded");

        Ok(Self {
            root: root.to_path_buf(),
            variants,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl VariantCatalog for DirectoryCatalog {
    fn list(&self) -> ScaffoldResult<Vec<Variant>> {
        Ok(self.variants.clone())
    }

    fn find(&self, id: &str) -> ScaffoldResult<Option<Variant>> {
        Ok(self.variants.iter().find(|v| v.id.as_str() == id).cloned())
    }
}

// ── Manifest → Variant ────────────────────────────────────────────────────────

fn invalid(path: &Path, reason: impl std::fmt::Display) -> DomainError {
    DomainError::InvalidVariant(format!("{}: {reason}", path.display()))
}

/// Parse one manifest and read the bodies it references.
pub fn load_manifest(path: &Path) -> Result<Variant, DomainError> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let raw = fs::read_to_string(path).map_err(|e| invalid(path, e))?;
    let manifest: VariantManifest = toml::from_str(&raw).map_err(|e| invalid(path, e))?;
    let id = manifest.variant.id.clone();

    let options = manifest
        .options
        .into_iter()
        .map(|entry| option_spec(path, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = Variant::builder()
        .id(&id)
        .title(manifest.variant.title.unwrap_or_else(|| id.clone()))
        .description(manifest.variant.description.unwrap_or_default())
        .schema(Schema::new(options));

    for gate in manifest.gates {
        let mut family = GateFamily::new(gate.name, gate.option);
        for (label, predicate) in gate.branches {
            let predicate: VersionPredicate = predicate.parse().map_err(|e| invalid(path, e))?;
            family = family.branch(label, predicate);
        }
        builder = builder.gate(family);
    }

    for file in manifest.files {
        let input = RelativePath::try_new(&file.input)?;
        let body = fs::read_to_string(dir.join(input.as_path()))
            .map_err(|e| invalid(path, format!("cannot read '{}': {e}", file.input)))?;
        let out = match file.out {
            Some(out) => out,
            None => input
                .as_path()
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| invalid(path, format!("'{}' has no file name", file.input)))?,
        };
        let mut template =
            FileTemplate::new(format!("{id}/{}", input), out, body).bypass(file.bypass);
        if let Some(when) = file.when {
            template = template.when(when.into());
        }
        builder = builder.file(template);
    }

    builder.build()
}

fn option_spec(path: &Path, entry: OptionEntry) -> Result<OptionSpec, DomainError> {
    let kind = match entry.kind {
        KindEntry::Bool => OptionKind::Bool,
        KindEntry::Text => OptionKind::Text,
        KindEntry::Identifier => OptionKind::Identifier,
        KindEntry::Version => OptionKind::Version,
        KindEntry::List => OptionKind::List,
        KindEntry::Choice => match entry.choices {
            Some(choices) if !choices.is_empty() => OptionKind::Choice(choices),
            _ => {
                return Err(invalid(
                    path,
                    format!("option '{}' is a choice without choices", entry.name),
                ));
            }
        },
    };

    let mut spec = OptionSpec::new(&entry.name, kind);
    spec = match (entry.presence, entry.when) {
        (PresenceEntry::Required, None) => spec.required(),
        (PresenceEntry::Optional, None) => spec,
        (PresenceEntry::Iff, Some(when)) => spec.iff(when.into()),
        (PresenceEntry::Iff, None) => {
            return Err(invalid(
                path,
                format!("option '{}' is 'iff' but has no 'when'", entry.name),
            ));
        }
        (_, Some(_)) => {
            return Err(invalid(
                path,
                format!("option '{}' has 'when' but presence is not 'iff'", entry.name),
            ));
        }
    };
    if let Some(default) = entry.default {
        spec = spec.default_value(default);
    }
    if let Some(description) = entry.description {
        spec = spec.describe(description);
    }
    Ok(spec)
}
