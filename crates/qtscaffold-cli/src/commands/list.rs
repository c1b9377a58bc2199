//! Implementation of the `qtscaffold list` command.

use qtscaffold_core::application::VariantInfo;
use serde::Serialize;

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// One row of `list --format json`.
#[derive(Debug, Serialize)]
struct VariantRow<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    options: usize,
    files: usize,
    gates: &'a [String],
}

impl<'a> From<&'a VariantInfo> for VariantRow<'a> {
    fn from(info: &'a VariantInfo) -> Self {
        Self {
            id: &info.id,
            title: &info.title,
            description: &info.description,
            options: info.options,
            files: info.files,
            gates: &info.gates,
        }
    }
}

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = super::service(args.templates.as_ref(), &config)?;
    let variants = service.list_variants()?;

    match args.format {
        ListFormat::Table => {
            output.header("Available variants:")?;
            let width = variants.iter().map(|v| v.id.len()).max().unwrap_or(0);
            for v in &variants {
                output.data(&format!(
                    "  {:<width$}  {}  {}",
                    v.id,
                    v.title,
                    output.dim(&format!("({} options, {} files)", v.options, v.files)),
                ))?;
            }
        }

        ListFormat::List => {
            for v in &variants {
                output.data(&v.id)?;
            }
        }

        ListFormat::Json => {
            // Emitted through `data` so quiet mode cannot break a pipe.
            output.data(&to_json(&variants)?)?;
        }
    }

    Ok(())
}

fn to_json(variants: &[VariantInfo]) -> CliResult<String> {
    let rows: Vec<VariantRow<'_>> = variants.iter().map(VariantRow::from).collect();
    serde_json::to_string_pretty(&rows).map_err(|e| CliError::InvalidInput {
        message: format!("failed to serialise variant list: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_rows_carry_every_field() {
        let info = VariantInfo {
            id: "qwidget".into(),
            title: "Qt Widgets Application".into(),
            description: "Widget class with optional Designer form".into(),
            options: 9,
            files: 4,
            gates: vec![],
        };
        let json = to_json(&[info]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["id"], "qwidget");
        assert_eq!(parsed[0]["files"], 4);
        assert!(parsed[0]["gates"].as_array().unwrap().is_empty());
    }
}
