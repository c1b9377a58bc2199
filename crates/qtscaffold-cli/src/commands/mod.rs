//! Command handlers. Each module turns parsed arguments into calls on the
//! core services and prints the result; no business logic lives here.

use std::path::{Path, PathBuf};

use qtscaffold_adapters::{
    BuiltinCatalog, DirectoryCatalog, LayeredCatalog, LocalFilesystem, MiniJinjaEngine,
};
use qtscaffold_core::application::{ScaffoldService, ports::VariantCatalog};
use tracing::debug;

use crate::{config::AppConfig, error::CliResult};

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod new;
pub mod show;

/// Custom variant directory: the flag wins over the configuration file.
fn templates_dir(flag: Option<&PathBuf>, config: &AppConfig) -> Option<PathBuf> {
    flag.cloned().or_else(|| config.templates.directory.clone())
}

/// Built-in variants, shadowed by a custom directory when one is given.
fn catalog(templates: Option<&Path>) -> CliResult<Box<dyn VariantCatalog>> {
    match templates {
        Some(dir) => {
            debug!(dir = %dir.display(), "loading custom variants");
            let custom = DirectoryCatalog::load(dir, &MiniJinjaEngine::new())?;
            Ok(Box::new(
                LayeredCatalog::new()
                    .layer(custom)
                    .layer(BuiltinCatalog::new()),
            ))
        }
        None => Ok(Box::new(BuiltinCatalog::new())),
    }
}

/// Service wired to the real filesystem.
pub(crate) fn service(flag: Option<&PathBuf>, config: &AppConfig) -> CliResult<ScaffoldService> {
    let templates = templates_dir(flag, config);
    Ok(ScaffoldService::new(
        catalog(templates.as_deref())?,
        Box::new(MiniJinjaEngine::new()),
        Box::new(LocalFilesystem::new()),
    ))
}
