//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire scaffolding workflow:
//! 1. Resolve the variant in the catalog
//! 2. Validate the configuration against its schema
//! 3. Render every file in one pass
//! 4. Emit all files, or none
//!
//! Each step is a lifecycle phase; the report carries the full history.

use std::path::Path;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ports::{Filesystem, TemplateEngine, VariantCatalog},
        services::{
            catalog_service::{CatalogService, VariantInfo},
            lifecycle::{Phase, ScaffoldLifecycle},
            project_emitter::{EmitOptions, EmitReport, ProjectEmitter},
            variant_renderer::VariantRenderer,
        },
    },
    domain::{Configuration, RenderedProject, Variant, VariantId},
    error::ScaffoldResult,
};

/// Outcome of a successful scaffold run.
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub run_id: Uuid,
    pub variant: VariantId,
    pub emit: EmitReport,
    pub phases: Vec<Phase>,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    catalog: Box<dyn VariantCatalog>,
    engine: Box<dyn TemplateEngine>,
    filesystem: Box<dyn Filesystem>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// ```rust,ignore
    /// let service = ScaffoldService::new(
    ///     Box::new(BuiltinCatalog::new()),
    ///     Box::new(MiniJinjaEngine::new()),
    ///     Box::new(LocalFilesystem::new()),
    /// );
    /// ```
    pub fn new(
        catalog: Box<dyn VariantCatalog>,
        engine: Box<dyn TemplateEngine>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            catalog,
            engine,
            filesystem,
        }
    }

    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.catalog.as_ref())
    }

    pub fn renderer(&self) -> VariantRenderer<'_> {
        VariantRenderer::new(self.engine.as_ref())
    }

    pub fn emitter(&self) -> ProjectEmitter<'_> {
        ProjectEmitter::new(self.filesystem.as_ref())
    }

    pub fn list_variants(&self) -> ScaffoldResult<Vec<VariantInfo>> {
        self.catalog().list()
    }

    /// Resolve and consistency-check a variant.
    pub fn describe(&self, variant_id: &str) -> ScaffoldResult<Variant> {
        let variant = self.catalog().get(variant_id)?;
        self.renderer().check_variant(&variant)?;
        Ok(variant)
    }

    /// Render without writing anything.
    #[instrument(skip_all, fields(variant = %variant_id))]
    pub fn render(
        &self,
        variant_id: &str,
        config: &Configuration,
    ) -> ScaffoldResult<RenderedProject> {
        let variant = self.describe(variant_id)?;
        self.renderer().render_configuration(&variant, config)
    }

    /// Render and write a project under `root`.
    #[instrument(
        skip_all,
        fields(variant = %variant_id, root = %root.as_ref().display())
    )]
    pub fn scaffold(
        &self,
        variant_id: &str,
        config: &Configuration,
        root: impl AsRef<Path>,
        options: &EmitOptions,
    ) -> ScaffoldResult<ScaffoldReport> {
        let mut lifecycle = ScaffoldLifecycle::new();
        info!(run_id = %lifecycle.run_id(), "scaffolding {} project", variant_id);

        match self.run(&mut lifecycle, variant_id, config, root.as_ref(), options) {
            Ok((variant, emit)) => {
                lifecycle.advance(Phase::Done)?;
                info!(files = emit.files_written(), "scaffold completed successfully");
                Ok(ScaffoldReport {
                    run_id: lifecycle.run_id(),
                    variant,
                    emit,
                    phases: lifecycle.history().to_vec(),
                })
            }
            Err(e) => {
                lifecycle.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn run(
        &self,
        lifecycle: &mut ScaffoldLifecycle,
        variant_id: &str,
        config: &Configuration,
        root: &Path,
        options: &EmitOptions,
    ) -> ScaffoldResult<(VariantId, EmitReport)> {
        let variant = self.describe(variant_id)?;

        let validated = variant.schema.validate(variant.id.as_str(), config)?;
        lifecycle.advance(Phase::ConfigValidated)?;

        let project = self.renderer().render(&variant, &validated)?;
        lifecycle.advance(Phase::Rendered)?;

        let report = self.emitter().emit(&project, root, options)?;
        lifecycle.advance(Phase::Emitted)?;

        Ok((variant.id, report))
    }
}
