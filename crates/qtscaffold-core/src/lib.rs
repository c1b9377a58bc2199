//! qtscaffold Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the qtscaffold
//! project generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          qtscaffold-cli (CLI)           │
//! │     (Collects options, reports errors)  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, VariantRenderer,     │
//! │   ProjectEmitter, CatalogService)       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (VariantCatalog, TemplateEngine,        │
//! │  Filesystem)                            │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   qtscaffold-adapters (Infrastructure)  │
//! │ (BuiltinCatalog, MiniJinjaEngine,       │
//! │  LocalFilesystem, ...)                  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Schema, QtVersion, GateFamily,         │
//! │  Variant, SharedDecisions)              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qtscaffold_core::prelude::*;
//!
//! let config = Configuration::builder()
//!     .set("name", "gallery")
//!     .set("minimumQtVersion", "6.5")
//!     .build();
//!
//! // Adapters come from `qtscaffold-adapters`.
//! let service = ScaffoldService::new(catalog, engine, filesystem);
//! service.scaffold("qtquick", &config, "./gallery", &EmitOptions::default())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, CatalogService, EmitOptions, EmitReport, Phase, ProjectEmitter,
        ScaffoldReport, ScaffoldService, VariantInfo, VariantRenderer,
        ports::{Filesystem, TemplateEngine, VariantCatalog},
    };
    pub use crate::domain::{
        Condition, ConfigError, Configuration, ConfigurationBuilder, ContextValue, DomainError,
        FileTemplate, GateFamily, OptionKind, OptionSpec, OptionValue, Presence, QtVersion,
        RelativePath, RenderContext, RenderedFile, RenderedProject, Schema, SharedDecisions,
        TemplateError, TemplateErrorKind, ValidatedConfig, Variant, VariantBuilder, VariantId,
        VersionParseError, VersionPredicate,
    };
    pub use crate::error::{ErrorCategory, ScaffoldError, ScaffoldResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
