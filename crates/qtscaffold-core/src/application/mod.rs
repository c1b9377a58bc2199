//! Application layer for qtscaffold.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, VariantRenderer,
//!   ProjectEmitter, CatalogService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CatalogService, EmitOptions, EmitReport, Phase, ProjectEmitter, ScaffoldLifecycle,
    ScaffoldReport, ScaffoldService, VariantInfo, VariantRenderer,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateEngine, VariantCatalog};

pub use error::ApplicationError;
