//! Application ports (traits) for external dependencies.
//!
//! Adapters in `qtscaffold-adapters` implement these.
//!
//! - `Filesystem`: file operations the emitter journals and rolls back
//! - `VariantCatalog`: where variants come from
//! - `TemplateEngine`: template evaluation

pub mod output;

pub use output::{Filesystem, TemplateEngine, VariantCatalog};

#[cfg(test)]
pub use output::{MockFilesystem, MockTemplateEngine, MockVariantCatalog};
