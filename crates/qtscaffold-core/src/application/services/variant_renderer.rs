//! Variant Renderer - one render pass over all files of a variant.
//!
//! 1. Compute shared decisions once
//! 2. Build one immutable context
//! 3. Resolve every selected output path, rejecting collisions
//! 4. Render every body in parallel, collected in catalog order
//!
//! Any failure aborts the pass; no partial project is returned.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::{
    application::ports::TemplateEngine,
    domain::{
        ConfigError, Configuration, DomainError, DomainValidator as validator, FILE_NAME,
        FileTemplate, RelativePath, RenderContext, RenderedFile, RenderedProject,
        SharedDecisions, ValidatedConfig, Variant, decision_inputs, provided_names,
        source_option,
    },
    error::{ScaffoldError, ScaffoldResult},
};

pub struct VariantRenderer<'a> {
    engine: &'a dyn TemplateEngine,
}

impl<'a> VariantRenderer<'a> {
    pub fn new(engine: &'a dyn TemplateEngine) -> Self {
        Self { engine }
    }

    /// Static consistency checks over a whole variant.
    ///
    /// Every field a path pattern or body reads must be a plain schema
    /// option or a shared decision. Decision inputs themselves are off
    /// limits to templates.
    #[instrument(skip_all, fields(variant = %variant.id))]
    pub fn check_variant(&self, variant: &Variant) -> ScaffoldResult<()> {
        validator::validate_variant(variant)?;

        let inputs = decision_inputs(variant);
        let provided = provided_names(variant);

        for file in &variant.files {
            let mut fields = self
                .engine
                .referenced_fields(&file.output_name(), &file.output)?;
            // Verbatim bodies are never parsed.
            if !file.bypass {
                fields.extend(self.engine.referenced_fields(&file.name, &file.body)?);
            }

            for field in &fields {
                let root = field.split('.').next().unwrap_or(field);
                if let Some(decision) = inputs.get(root) {
                    return Err(DomainError::RawDecisionInput {
                        variant: variant.id.to_string(),
                        template: file.name.clone(),
                        option: root.to_string(),
                        decision: *decision,
                    }
                    .into());
                }
                if !provided.contains(root) && !variant.schema.declares(root) {
                    return Err(DomainError::UndeclaredField {
                        variant: variant.id.to_string(),
                        template: file.name.clone(),
                        field: field.clone(),
                    }
                    .into());
                }
            }
        }

        debug!(files = variant.files.len(), "variant is consistent");
        Ok(())
    }

    /// Validate a raw configuration, then render.
    pub fn render_configuration(
        &self,
        variant: &Variant,
        config: &Configuration,
    ) -> ScaffoldResult<RenderedProject> {
        let validated = variant.schema.validate(variant.id.as_str(), config)?;
        self.render(variant, &validated)
    }

    #[instrument(skip_all, fields(variant = %variant.id))]
    pub fn render(
        &self,
        variant: &Variant,
        config: &ValidatedConfig,
    ) -> ScaffoldResult<RenderedProject> {
        let decisions = SharedDecisions::compute(variant, config)?;
        let context = decisions.render_context(variant, config);
        debug!(gates = ?decisions.gates, "shared decisions computed");

        let selected: Vec<&FileTemplate> = variant
            .files
            .iter()
            .filter(|f| f.when.as_ref().is_none_or(|c| c.holds_for(config)))
            .collect();

        let paths = self.resolve_paths(variant, config, &selected, &context)?;

        // Indexed parallel collect keeps catalog order.
        let files = selected
            .par_iter()
            .zip(paths.into_par_iter())
            .map(|(file, path)| self.render_body(file, path, &context))
            .collect::<ScaffoldResult<Vec<_>>>()?;

        let project = RenderedProject::new(variant.id.clone(), files)?;
        info!(files = project.len(), "variant rendered");
        Ok(project)
    }

    /// Render every path pattern before any body.
    ///
    /// Two files on one path is a configuration problem when an option fed
    /// either pattern, and a catalog defect otherwise.
    fn resolve_paths(
        &self,
        variant: &Variant,
        config: &ValidatedConfig,
        selected: &[&FileTemplate],
        context: &RenderContext,
    ) -> ScaffoldResult<Vec<RelativePath>> {
        let mut seen: HashMap<RelativePath, usize> = HashMap::with_capacity(selected.len());
        let mut paths = Vec::with_capacity(selected.len());

        for (index, file) in selected.iter().enumerate() {
            let path = self
                .engine
                .render(&file.output_name(), &file.output, context)?;
            let path = RelativePath::try_new(path.trim())?;

            if let Some(&first) = seen.get(&path) {
                return Err(self.path_conflict(variant, config, [selected[first], *file], &path));
            }
            seen.insert(path.clone(), index);
            paths.push(path);
        }
        Ok(paths)
    }

    fn path_conflict(
        &self,
        variant: &Variant,
        config: &ValidatedConfig,
        files: [&FileTemplate; 2],
        path: &RelativePath,
    ) -> ScaffoldError {
        for file in files {
            let Ok(fields) = self
                .engine
                .referenced_fields(&file.output_name(), &file.output)
            else {
                continue;
            };
            for field in &fields {
                let root = field.split('.').next().unwrap_or(field);
                let Some(option) = source_option(variant, root) else {
                    continue;
                };
                let value = config.get(option).map(ToString::to_string).unwrap_or_default();
                debug!(option, %path, "options drive two files onto one path");
                return ConfigError::ConflictingPath {
                    variant: variant.id.to_string(),
                    option: option.to_string(),
                    value,
                    path: path.to_string(),
                }
                .into();
            }
        }
        DomainError::DuplicatePath {
            path: path.to_string(),
        }
        .into()
    }

    fn render_body(
        &self,
        file: &FileTemplate,
        path: RelativePath,
        context: &RenderContext,
    ) -> ScaffoldResult<RenderedFile> {
        let body = if file.bypass {
            file.body.clone()
        } else {
            let file_context = context.clone().with(FILE_NAME, path.as_str());
            self.engine.render(&file.name, &file.body, &file_context)?
        };

        Ok(RenderedFile::new(path, body.trim_start()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::application::ports::MockTemplateEngine;
    use crate::domain::{
        Condition, OptionKind, OptionSpec, QtVersion, Schema, TemplateError, VersionPredicate,
        GateFamily,
    };
    use crate::error::ScaffoldError;

    fn variant(body: &str) -> Variant {
        Variant::builder()
            .id("qtquick")
            .schema(Schema::new(vec![
                OptionSpec::new("name", OptionKind::Identifier).required(),
                OptionSpec::new("minimumQtVersion", OptionKind::Version).default_value("6.8"),
                OptionSpec::new("useExtras", OptionKind::Bool).default_value(false),
            ]))
            .gate(
                GateFamily::new("qmlLoading", "minimumQtVersion")
                    .branch("url", VersionPredicate::lt(QtVersion::new(6, 5, 0)))
                    .branch("module", VersionPredicate::ge(QtVersion::new(6, 5, 0))),
            )
            .file(FileTemplate::new("qtquick/main.cpp", "main.cpp", body))
            .file(
                FileTemplate::new("qtquick/extras.txt", "extras.txt", "extra")
                    .when(Condition::equals("useExtras", true)),
            )
            .build()
            .unwrap()
    }

    fn fields(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_raw_decision_input() {
        let mut engine = MockTemplateEngine::new();
        engine
            .expect_referenced_fields()
            .returning(|name, _| {
                Ok(if name == "qtquick/main.cpp" {
                    fields(&["minimumQtVersion"])
                } else {
                    BTreeSet::new()
                })
            });

        let err = VariantRenderer::new(&engine)
            .check_variant(&variant("..."))
            .unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Domain(DomainError::RawDecisionInput { decision: "gate", .. })
        ));
    }

    #[test]
    fn rejects_undeclared_field() {
        let mut engine = MockTemplateEngine::new();
        engine
            .expect_referenced_fields()
            .returning(|_, _| Ok(fields(&["name", "gate.qmlLoading", "projectTitle"])));

        let err = VariantRenderer::new(&engine)
            .check_variant(&variant("..."))
            .unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Domain(DomainError::UndeclaredField { ref field, .. }) if field == "projectTitle"
        ));
    }

    #[test]
    fn accepts_decisions_and_plain_options() {
        let mut engine = MockTemplateEngine::new();
        engine
            .expect_referenced_fields()
            .returning(|_, _| Ok(fields(&["name", "gate.qmlLoading", "fileName", "useExtras"])));

        assert!(VariantRenderer::new(&engine).check_variant(&variant("...")).is_ok());
    }

    #[test]
    fn when_condition_skips_files_and_bodies_are_trimmed() {
        let mut engine = MockTemplateEngine::new();
        engine.expect_render().returning(|name, source, ctx| {
            if name.ends_with("#path") {
                return Ok(source.to_string());
            }
            let gate = ctx.lookup("gate.qmlLoading").and_then(|v| v.as_text().map(str::to_string));
            Ok(format!("\n\n{}:{}\n", source, gate.unwrap_or_default()))
        });

        let config = Configuration::builder()
            .set("name", "app")
            .set("minimumQtVersion", "6.4")
            .build();
        let project = VariantRenderer::new(&engine)
            .render_configuration(&variant("main"), &config)
            .unwrap();

        assert_eq!(project.len(), 1);
        assert_eq!(project.files()[0].content, "main:url\n");
    }

    #[test]
    fn template_error_aborts_pass() {
        let mut engine = MockTemplateEngine::new();
        engine.expect_render().returning(|name, source, _| {
            if name == "qtquick/extras.txt" {
                Err(TemplateError::undefined_field(name, "missing", Some(1)))
            } else {
                Ok(source.to_string())
            }
        });

        let config = Configuration::builder()
            .set("name", "app")
            .set("useExtras", true)
            .build();
        let result = VariantRenderer::new(&engine).render_configuration(&variant("main"), &config);
        assert!(matches!(result, Err(ScaffoldError::Template(_))));
    }

    #[test]
    fn bypass_body_is_copied_verbatim() {
        let asset = "Text { text: \"{{ literal }}\" }\n";
        let variant = Variant::builder()
            .id("qtquick")
            .schema(Schema::new(vec![
                OptionSpec::new("name", OptionKind::Identifier).required(),
            ]))
            .file(FileTemplate::new("qtquick/main.cpp", "main.cpp", "main"))
            .file(FileTemplate::new("qtquick/Asset.qml", "Asset.qml", asset).bypass(true))
            .build()
            .unwrap();

        let mut engine = MockTemplateEngine::new();
        engine
            .expect_referenced_fields()
            .withf(|name, _| name != "qtquick/Asset.qml")
            .returning(|_, _| Ok(BTreeSet::new()));
        engine
            .expect_render()
            .withf(|name, _, _| name != "qtquick/Asset.qml")
            .returning(|_, source, _| Ok(source.to_string()));

        let renderer = VariantRenderer::new(&engine);
        renderer.check_variant(&variant).unwrap();

        let config = Configuration::builder().set("name", "app").build();
        let project = renderer.render_configuration(&variant, &config).unwrap();
        assert_eq!(project.file("Asset.qml").unwrap().content, asset);
    }

    fn classes_variant() -> Variant {
        Variant::builder()
            .id("qwidget")
            .schema(Schema::new(vec![
                OptionSpec::new("name", OptionKind::Identifier).required(),
                OptionSpec::new("className", OptionKind::Identifier).default_value("Widget"),
            ]))
            .file(FileTemplate::new("qwidget/main.cpp", "main.cpp", "main"))
            .file(FileTemplate::new("qwidget/widget.cpp", "{{ sourceFile }}", "source"))
            .build()
            .unwrap()
    }

    fn path_engine() -> MockTemplateEngine {
        let mut engine = MockTemplateEngine::new();
        engine.expect_render().returning(|name, source, ctx| {
            if source == "{{ sourceFile }}" {
                let file = ctx.lookup("sourceFile").and_then(|v| v.as_text().map(str::to_string));
                return Ok(file.unwrap_or_default());
            }
            assert!(name.ends_with("#path"), "body rendered: {name}");
            Ok(source.to_string())
        });
        engine.expect_referenced_fields().returning(|_, source| {
            Ok(if source == "{{ sourceFile }}" {
                fields(&["sourceFile"])
            } else {
                BTreeSet::new()
            })
        });
        engine
    }

    #[test]
    fn class_name_colliding_with_fixed_file_is_config_error() {
        let engine = path_engine();
        let config = Configuration::builder()
            .set("name", "app")
            .set("className", "Main")
            .build();

        let err = VariantRenderer::new(&engine)
            .render_configuration(&classes_variant(), &config)
            .unwrap_err();
        assert!(err.is_validation_failure());
        match err {
            ScaffoldError::Config(ConfigError::ConflictingPath { option, value, path, .. }) => {
                assert_eq!(option, "className");
                assert_eq!(value, "Main");
                assert_eq!(path, "main.cpp");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn literal_paths_colliding_is_catalog_defect() {
        let variant = Variant::builder()
            .id("qwidget")
            .schema(Schema::new(vec![
                OptionSpec::new("name", OptionKind::Identifier).required(),
            ]))
            .file(FileTemplate::new("qwidget/a", "main.cpp", "a"))
            .file(FileTemplate::new("qwidget/b", "main.cpp", "b"))
            .build()
            .unwrap();

        let engine = path_engine();
        let config = Configuration::builder().set("name", "app").build();
        let err = VariantRenderer::new(&engine)
            .render_configuration(&variant, &config)
            .unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::Domain(DomainError::DuplicatePath { ref path }) if path == "main.cpp"
        ));
    }

    #[test]
    fn invalid_config_renders_nothing() {
        let mut engine = MockTemplateEngine::new();
        engine.expect_render().never();

        let config = Configuration::builder().set("minimumQtVersion", "6.5").build();
        let result = VariantRenderer::new(&engine).render_configuration(&variant("main"), &config);
        assert!(matches!(result, Err(e) if e.is_validation_failure()));
    }
}
