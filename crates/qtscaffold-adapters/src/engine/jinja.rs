//! MiniJinja-backed template engine.
//!
//! Strict undefined handling: reading a field the context does not have is
//! an error, never an empty string. Block tags sit on their own lines in the
//! catalog templates, so `trim_blocks` and `lstrip_blocks` are on.

use std::collections::BTreeSet;

use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use qtscaffold_core::{
    application::ports::TemplateEngine,
    domain::{RenderContext, TemplateError, TemplateErrorKind},
};
use tracing::{instrument, trace};

#[derive(Debug, Clone, Copy, Default)]
pub struct MiniJinjaEngine;

impl MiniJinjaEngine {
    pub fn new() -> Self {
        Self
    }

    fn environment<'s>() -> Environment<'s> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env
    }

    /// Translate a MiniJinja error, naming the missing field when the engine
    /// could not.
    fn map_error(
        name: &str,
        source: &str,
        context: Option<&RenderContext>,
        err: &minijinja::Error,
    ) -> TemplateError {
        let kind = match err.kind() {
            ErrorKind::UndefinedError => TemplateErrorKind::UndefinedField {
                field: context
                    .and_then(|ctx| missing_field(name, source, ctx, err))
                    .unwrap_or_else(|| "<unknown>".to_string()),
            },
            ErrorKind::SyntaxError => TemplateErrorKind::Syntax,
            _ => TemplateErrorKind::Evaluation,
        };

        TemplateError {
            template: name.to_string(),
            kind,
            line: err.line(),
            detail: err
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| err.kind().to_string()),
        }
    }
}

/// The field behind an undefined-value error.
///
/// A field named by the error detail wins, then one inside the expression or
/// line the error points at. Otherwise the first field the context lacks.
fn missing_field(
    name: &str,
    source: &str,
    ctx: &RenderContext,
    err: &minijinja::Error,
) -> Option<String> {
    let env = MiniJinjaEngine::environment();
    let template = env.template_from_named_str(name, source).ok()?;
    let mut missing: Vec<String> = template
        .undeclared_variables(true)
        .into_iter()
        .filter(|f| !ctx.contains(f))
        .collect();
    missing.sort();

    let located = |text: &str| missing.iter().find(|f| mentions(text, f)).cloned();

    err.detail()
        .and_then(located)
        .or_else(|| err.range().and_then(|r| source.get(r)).and_then(located))
        .or_else(|| {
            err.line()
                .and_then(|n| source.lines().nth(n - 1))
                .and_then(located)
        })
        .or_else(|| missing.first().cloned())
}

/// Whether `field` occurs in `text` as a whole name.
fn mentions(text: &str, field: &str) -> bool {
    let is_name = |c: char| c.is_alphanumeric() || c == '_';
    text.match_indices(field).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + field.len()..].chars().next();
        !before.is_some_and(is_name) && !after.is_some_and(is_name)
    })
}

impl TemplateEngine for MiniJinjaEngine {
    #[instrument(skip(self, source, context), fields(template = %name))]
    fn render(
        &self,
        name: &str,
        source: &str,
        context: &RenderContext,
    ) -> Result<String, TemplateError> {
        let env = Self::environment();
        let rendered = env
            .render_named_str(name, source, context)
            .map_err(|e| Self::map_error(name, source, Some(context), &e))?;
        trace!(bytes = rendered.len(), "rendered");
        Ok(rendered)
    }

    fn referenced_fields(
        &self,
        name: &str,
        source: &str,
    ) -> Result<BTreeSet<String>, TemplateError> {
        let env = Self::environment();
        let template = env
            .template_from_named_str(name, source)
            .map_err(|e| Self::map_error(name, source, None, &e))?;
        Ok(template.undeclared_variables(true).into_iter().collect())
    }
}
