//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "qtscaffold",
    bin_name = "qtscaffold",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scaffold Qt application projects",
    long_about = "qtscaffold generates the initial sources of a Qt application \
                  (Qt Quick or Qt Widgets) with every file kept consistent \
                  with every other.",
    after_help = "EXAMPLES:\n\
        \x20 qtscaffold new gallery --variant qtquick --set minimumQtVersion=6.5\n\
        \x20 qtscaffold new notes   --variant qwidget --set useForm=true --set uiUsage=member\n\
        \x20 qtscaffold show qwidget\n\
        \x20 qtscaffold completions bash > /usr/share/bash-completion/completions/qtscaffold",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a variant.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 qtscaffold new gallery --variant qtquick\n\
            \x20 qtscaffold new notes   --variant qwidget --set className=MainWindow --set baseClass=QMainWindow\n\
            \x20 qtscaffold new notes   --preset widgets-form --output ~/src\n\
            \x20 qtscaffold new notes   --variant qwidget --interactive"
    )]
    New(NewArgs),

    /// List available variants.
    #[command(
        visible_alias = "ls",
        about = "List available variants",
        after_help = "EXAMPLES:\n\
            \x20 qtscaffold list\n\
            \x20 qtscaffold list --format json\n\
            \x20 qtscaffold list --templates ./my-variants"
    )]
    List(ListArgs),

    /// Describe one variant: options, files and version gates.
    #[command(
        about = "Show a variant's options and files",
        after_help = "EXAMPLES:\n\
            \x20 qtscaffold show qwidget"
    )]
    Show(ShowArgs),

    /// Initialise a qtscaffold configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 qtscaffold init           # default location\n\
            \x20 qtscaffold init --local   # ./.qtscaffold.toml\n\
            \x20 qtscaffold -c my.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 qtscaffold completions bash > ~/.local/share/bash-completion/completions/qtscaffold\n\
            \x20 qtscaffold completions zsh  > ~/.zfunc/_qtscaffold\n\
            \x20 qtscaffold completions fish > ~/.config/fish/completions/qtscaffold.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the qtscaffold configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 qtscaffold config get defaults.variant\n\
            \x20 qtscaffold config list\n\
            \x20 qtscaffold config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `qtscaffold new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path. The last component becomes the `name` option;
    /// the project is created at that path.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// Variant to generate.
    #[arg(
        short = 't',
        long = "variant",
        value_name = "ID",
        help = "Variant to generate (see 'qtscaffold list')"
    )]
    pub variant: Option<String>,

    /// Option assignments, repeatable.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        help = "Set a variant option, e.g. --set useForm=true"
    )]
    pub set: Vec<String>,

    /// Named preset from the configuration file.
    #[arg(
        short = 'p',
        long = "preset",
        value_name = "NAME",
        help = "Start from a preset in the configuration file"
    )]
    pub preset: Option<String>,

    /// Directory the project path is resolved against.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Additional variant directory, searched before the built-in variants.
    #[arg(
        long = "templates",
        value_name = "DIR",
        help = "Directory of custom variants (variant.toml manifests)"
    )]
    pub templates: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Replace files that already exist.
    #[arg(long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Render everything but write nothing.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Prompt for every option not given on the command line.
    #[arg(
        short = 'i',
        long = "interactive",
        help = "Prompt for options not set by flags or preset"
    )]
    pub interactive: bool,
}

// ── list / show ───────────────────────────────────────────────────────────────

/// Arguments for `qtscaffold list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,

    /// Additional variant directory.
    #[arg(long = "templates", value_name = "DIR", help = "Directory of custom variants")]
    pub templates: Option<PathBuf>,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON array.
    Json,
}

/// Arguments for `qtscaffold show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Variant id.
    #[arg(value_name = "ID")]
    pub variant: String,

    /// Additional variant directory.
    #[arg(long = "templates", value_name = "DIR", help = "Directory of custom variants")]
    pub templates: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `qtscaffold init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.qtscaffold.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `qtscaffold completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `qtscaffold config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.variant`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
