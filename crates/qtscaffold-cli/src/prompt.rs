//! Interactive prompts.
//!
//! With the `interactive` feature, `dialoguer` asks for every option that
//! is still unset and currently allowed, in schema order, so an answer to
//! `useForm` decides whether `uiUsage` is asked at all. Without the feature
//! only the plain confirmation prompt remains.

#[cfg(not(feature = "interactive"))]
use crate::error::{CliError, CliResult};

#[cfg(feature = "interactive")]
mod interactive {
    use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
    use qtscaffold_core::domain::{OptionKind, OptionSpec, OptionValue, Presence, Schema};

    use crate::error::{CliError, CliResult};
    use crate::options::{OptionValues, coerce, effective, is_allowed, suggested_value};

    fn prompt_error(e: dialoguer::Error) -> CliError {
        CliError::InvalidInput {
            message: "prompt failed".into(),
            source: Some(Box::new(e)),
        }
    }

    fn label(spec: &OptionSpec) -> String {
        if spec.description.is_empty() {
            spec.name.clone()
        } else {
            format!("{} ({})", spec.name, spec.description)
        }
    }

    /// Ask for every unset option that the schema allows right now.
    pub fn prompt_missing(schema: &Schema, values: &mut OptionValues) -> CliResult<()> {
        let theme = ColorfulTheme::default();

        for spec in schema.options() {
            if values.contains_key(&spec.name) || !is_allowed(spec, &effective(schema, values)) {
                continue;
            }
            let suggestion = suggested_value(&spec.name, schema, values);
            if let Some(answer) = ask(&theme, spec, suggestion)? {
                let value = coerce(spec, answer)?;
                values.insert(spec.name.clone(), value);
            }
        }
        Ok(())
    }

    fn ask(
        theme: &ColorfulTheme,
        spec: &OptionSpec,
        suggestion: Option<String>,
    ) -> CliResult<Option<OptionValue>> {
        let default = spec.default.clone();

        match &spec.kind {
            OptionKind::Bool => {
                let answer = Confirm::with_theme(theme)
                    .with_prompt(label(spec))
                    .default(default.and_then(|d| d.as_bool()).unwrap_or(false))
                    .interact()
                    .map_err(prompt_error)?;
                Ok(Some(OptionValue::Bool(answer)))
            }
            OptionKind::Choice(choices) => {
                let selected = default
                    .as_ref()
                    .and_then(OptionValue::as_text)
                    .and_then(|d| choices.iter().position(|c| c == d))
                    .unwrap_or(0);
                let index = Select::with_theme(theme)
                    .with_prompt(label(spec))
                    .items(choices)
                    .default(selected)
                    .interact()
                    .map_err(prompt_error)?;
                Ok(choices.get(index).cloned().map(OptionValue::Text))
            }
            _ => {
                let mandatory = !matches!(spec.presence, Presence::Optional);
                let mut input = Input::<String>::with_theme(theme)
                    .with_prompt(label(spec))
                    .allow_empty(!mandatory);
                if let Some(initial) = default.map(|d| d.to_string()).or(suggestion) {
                    input = input.default(initial);
                }
                let answer = input.interact_text().map_err(prompt_error)?;
                if answer.trim().is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(OptionValue::Text(answer)))
                }
            }
        }
    }

    pub fn confirm(prompt: &str) -> CliResult<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(prompt_error)
    }
}

#[cfg(feature = "interactive")]
pub use interactive::{confirm, prompt_missing};

#[cfg(not(feature = "interactive"))]
pub fn prompt_missing(
    _schema: &qtscaffold_core::domain::Schema,
    _values: &mut crate::options::OptionValues,
) -> CliResult<()> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(not(feature = "interactive"))]
pub fn confirm(prompt: &str) -> CliResult<bool> {
    use std::io::{self, Write};

    print!("{prompt} [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}
