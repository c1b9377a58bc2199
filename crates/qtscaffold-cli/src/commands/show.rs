//! Implementation of the `qtscaffold show` command.

use qtscaffold_core::domain::{OptionSpec, Presence, Variant};

use crate::{
    cli::ShowArgs,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ShowArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = super::service(args.templates.as_ref(), &config)?;
    let variant = service.describe(&args.variant)?;

    for line in describe(&variant) {
        match line {
            Line::Header(text) => output.header(&text)?,
            Line::Detail(text, note) if note.is_empty() => output.data(&text)?,
            Line::Detail(text, note) => output.data(&format!("{text}  {}", output.dim(&note)))?,
            Line::Blank => output.data("")?,
        }
    }
    Ok(())
}

enum Line {
    Header(String),
    Detail(String, String),
    Blank,
}

fn presence(spec: &OptionSpec) -> String {
    match &spec.presence {
        Presence::Required => "required".into(),
        Presence::Optional => "optional".into(),
        Presence::Iff(condition) => format!("required iff {condition}"),
    }
}

fn describe(variant: &Variant) -> Vec<Line> {
    let mut lines = vec![
        Line::Header(format!("{} - {}", variant.id, variant.title)),
        Line::Detail(format!("  {}", variant.description), String::new()),
        Line::Blank,
        Line::Header("Options:".into()),
    ];

    for spec in variant.schema.options() {
        let default = spec
            .default
            .as_ref()
            .map(|d| format!(", default {d}"))
            .unwrap_or_default();
        lines.push(Line::Detail(
            format!("  {} : {} ({}{default})", spec.name, spec.kind, presence(spec)),
            spec.description.clone(),
        ));
    }

    lines.push(Line::Blank);
    lines.push(Line::Header("Files:".into()));
    for file in &variant.files {
        let note = file
            .when
            .as_ref()
            .map(|c| format!("when {c}"))
            .unwrap_or_default();
        lines.push(Line::Detail(format!("  {}", file.output), note));
    }

    if !variant.gates.is_empty() {
        lines.push(Line::Blank);
        lines.push(Line::Header("Version gates:".into()));
        for gate in &variant.gates {
            let branches: Vec<String> = gate
                .branches()
                .iter()
                .map(|b| format!("{} {}", b.label, b.predicate))
                .collect();
            lines.push(Line::Detail(
                format!("  {} on {}: {}", gate.name(), gate.option(), branches.join(", ")),
                String::new(),
            ));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtscaffold_adapters::catalog::{qtquick, qwidget};

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| match l {
                Line::Header(t) => t.clone(),
                Line::Detail(t, n) => format!("{t} {n}"),
                Line::Blank => String::new(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn widget_variant_lists_conditional_options_and_files() {
        let out = text(&describe(&qwidget().unwrap()));
        assert!(out.contains("uiUsage"));
        assert!(out.contains("required iff"));
        assert!(out.contains("Files:"));
        assert!(out.contains("when"));
    }

    #[test]
    fn quick_variant_shows_gates() {
        let out = text(&describe(&qtquick().unwrap()));
        assert!(out.contains("Version gates:"));
        assert!(out.contains("minimumQtVersion"));
        assert!(out.contains("6.5"));
    }
}
