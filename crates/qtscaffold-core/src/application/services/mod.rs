//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "render a variant" or "scaffold a project".

pub mod catalog_service;
pub mod lifecycle;
pub mod project_emitter;
pub mod scaffold_service;
pub mod variant_renderer;

pub use catalog_service::{CatalogService, VariantInfo};
pub use lifecycle::{Phase, ScaffoldLifecycle};
pub use project_emitter::{EmitOptions, EmitReport, ProjectEmitter};
pub use scaffold_service::{ScaffoldReport, ScaffoldService};
pub use variant_renderer::VariantRenderer;
