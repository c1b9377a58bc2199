//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `QTSCAFFOLD__SECTION__KEY`
//!    (e.g. `QTSCAFFOLD__DEFAULTS__VARIANT=qwidget`)
//! 3. Config file (`--config`, or the platform config directory)
//! 4. Built-in defaults (always present)
//!
//! # Presets
//!
//! ```toml
//! [presets.widgets-form]
//! variant = "qwidget"
//! description = "Main window with a Designer form held by value"
//!
//! [presets.widgets-form.options]
//! className = "MainWindow"
//! baseClass = "QMainWindow"
//! useForm = true
//! uiUsage = "member"
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use qtscaffold_core::domain::OptionValue;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "QTSCAFFOLD";
pub const LOCAL_CONFIG_FILE: &str = ".qtscaffold.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Variant catalog settings.
    pub templates: TemplateConfig,
    /// Named option sets for `new --preset`.
    pub presets: BTreeMap<String, Preset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Variant used by `new` when neither `--variant` nor a preset names one.
    pub variant: Option<String>,
    /// Ask for confirmation before writing.
    pub confirm: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            variant: None,
            confirm: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory of custom variants, searched before the built-in ones.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub variant: String,
    pub description: Option<String>,
    pub options: BTreeMap<String, OptionValue>,
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = config_file.cloned().unwrap_or_else(Self::config_path);
        Self::load_from(&path, config_file.is_some())
    }

    /// Like [`Self::load`], but a missing file is never an error. Used by
    /// `init`, which is about to create it.
    pub fn load_optional(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = config_file.cloned().unwrap_or_else(Self::config_path);
        Self::load_from(&path, false)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to build default configuration")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// The configuration written by `init`: defaults plus one example preset.
    pub fn sample() -> Self {
        let options = BTreeMap::from([
            ("className".to_string(), OptionValue::from("MainWindow")),
            ("baseClass".to_string(), OptionValue::from("QMainWindow")),
            ("useForm".to_string(), OptionValue::from(true)),
            ("uiUsage".to_string(), OptionValue::from("member")),
        ]);
        Self {
            presets: BTreeMap::from([(
                "widgets-form".to_string(),
                Preset {
                    variant: "qwidget".into(),
                    description: Some("Main window with a Designer form held by value".into()),
                    options,
                },
            )]),
            ..Self::default()
        }
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.qtscaffold.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "qtscaffold", "qtscaffold")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_ask_for_confirmation() {
        let cfg = AppConfig::default();
        assert!(cfg.defaults.confirm);
        assert!(cfg.defaults.variant.is_none());
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn missing_optional_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml"), false).unwrap();
        assert!(cfg.presets.is_empty());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn missing_explicit_file_is_fine_when_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(AppConfig::load_optional(Some(&path)).is_ok());
    }

    #[test]
    fn sample_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml::to_string_pretty(&AppConfig::sample()).unwrap()).unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        let preset = cfg.preset("widgets-form").unwrap();
        assert_eq!(preset.variant, "qwidget");
        assert_eq!(preset.options.len(), 4);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
