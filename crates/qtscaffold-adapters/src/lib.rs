//! Infrastructure adapters for qtscaffold.
//!
//! This crate implements the ports defined in `qtscaffold-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod catalog;
pub mod engine;
pub mod filesystem;

// Re-export commonly used adapters
pub use catalog::{BuiltinCatalog, DirectoryCatalog, LayeredCatalog};
pub use engine::MiniJinjaEngine;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
