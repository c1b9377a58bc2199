//! Implementation of the `qtscaffold new` command.
//!
//! Collects option values from a preset, `--set` flags and prompts, hands
//! them to the scaffold service and reports what was written. Validation of
//! the values themselves happens in the core crate.

use std::path::{Path, PathBuf};

use qtscaffold_core::{
    application::EmitOptions,
    domain::{OptionValue, schema::is_identifier},
};
use tracing::{debug, info, instrument};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::{AppConfig, Preset},
    error::{CliError, CliResult},
    options::{self, OptionValues},
    output::OutputManager,
    prompt,
};

/// Execute the `qtscaffold new` command.
///
/// 1. Resolve the project directory and its name
/// 2. Pick the variant and collect option values
/// 3. Confirm with the user unless `--yes`, `--quiet` or `defaults.confirm = false`
/// 4. Render only for `--dry-run`, otherwise scaffold
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Resolve project path
    let (project_name, project_path) = resolve_project_path(&args.name, args.output.as_deref())?;
    validate_project_name(&project_name)?;

    // 2. Variant and option values
    let preset = find_preset(&config, args.preset.as_deref())?;
    let variant_id = pick_variant(args.variant.as_deref(), preset, &config)?;

    let service = super::service(args.templates.as_ref(), &config)?;
    let variant = service.describe(&variant_id)?;

    let mut values = options::resolve(&variant.schema, preset, &args.set)?;
    values
        .entry("name".to_string())
        .or_insert_with(|| OptionValue::Text(project_name.clone()));

    if args.interactive {
        prompt::prompt_missing(&variant.schema, &mut values)?;
    }
    options::derive_conveniences(&variant.schema, &mut values);

    debug!(variant = %variant_id, options = values.len(), "options resolved");

    // 3. Show configuration and confirm
    let ask = !args.yes && !args.dry_run && !global.quiet && config.defaults.confirm;
    if ask {
        show_configuration(&variant_id, &project_path, &values, &output)?;
        if !prompt::confirm("Continue?")? {
            return Err(CliError::Cancelled);
        }
    }

    let configuration = options::into_configuration(values);

    // 4a. Dry run: render and list, write nothing.
    if args.dry_run {
        let project = service.render(&variant_id, &configuration)?;
        output.info(&format!(
            "Dry run: would create {} file(s) in {}",
            project.len(),
            project_path.display(),
        ))?;
        for file in project.files() {
            output.print(&format!(
                "  {}  {}",
                file.path,
                output.dim(&format!("({} bytes)", file.size()))
            ))?;
        }
        return Ok(());
    }

    // 4b. Scaffold
    output.header(&format!("Creating '{project_name}' from {variant_id}..."))?;
    info!(variant = %variant_id, path = %project_path.display(), "scaffold started");

    let report = service.scaffold(
        &variant_id,
        &configuration,
        &project_path,
        &EmitOptions::default().overwrite(args.force),
    )?;

    info!(run_id = %report.run_id, files = report.emit.files_written(), "scaffold completed");

    for path in &report.emit.files_created {
        output.print(&format!("  created   {}", relative(path, &project_path)))?;
    }
    for path in &report.emit.files_replaced {
        output.print(&format!("  replaced  {}", relative(path, &project_path)))?;
    }

    output.success(&format!(
        "Project '{project_name}' created ({} files)",
        report.emit.files_written()
    ))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project_path.display()))?;
    }

    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// `(leaf name, project directory)`. The directory is `name` resolved
/// against `output`, or against the current directory.
pub fn resolve_project_path(name: &str, output: Option<&Path>) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract a project name from the path".into(),
        })?
        .to_string();

    let base = output.unwrap_or(Path::new("."));
    Ok((project_name, base.join(path)))
}

fn validate_project_name(name: &str) -> CliResult<()> {
    if name.is_empty() {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if !is_identifier(name) {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name must be a C++ identifier and not a keyword".into(),
        });
    }
    Ok(())
}

// ── Variant and preset selection ──────────────────────────────────────────────

fn find_preset<'a>(config: &'a AppConfig, name: Option<&str>) -> CliResult<Option<&'a Preset>> {
    let Some(name) = name else {
        return Ok(None);
    };
    config
        .preset(name)
        .map(Some)
        .ok_or_else(|| CliError::PresetNotFound {
            name: name.into(),
            available: config.presets.keys().cloned().collect(),
        })
}

/// `--variant`, then the preset's variant, then `defaults.variant`.
fn pick_variant(flag: Option<&str>, preset: Option<&Preset>, config: &AppConfig) -> CliResult<String> {
    flag.map(str::to_string)
        .or_else(|| {
            preset
                .map(|p| p.variant.clone())
                .filter(|v| !v.is_empty())
        })
        .or_else(|| config.defaults.variant.clone())
        .ok_or_else(|| {
            CliError::invalid_input(
                "no variant given; pass --variant, use a preset, or set defaults.variant",
            )
        })
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    variant: &str,
    location: &Path,
    values: &OptionValues,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Variant:   {variant}"))?;
    out.print(&format!("  Location:  {}", location.display()))?;
    for (name, value) in values {
        out.print(&format!("  {name} = {value}"))?;
    }
    out.print("")?;
    Ok(())
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
