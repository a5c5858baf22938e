//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{ArgGroup, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// envboot - Bring a developer machine to a known-good state.
#[derive(Debug, Parser)]
#[command(name = "envboot")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides .envboot/config.yml discovery)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "ENVBOOT_DEBUG")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect, plan, install and verify (default if no command specified)
    Run(RunArgs),

    /// Show what a run would do without changing anything
    Plan(PlanArgs),

    /// Show the platform and the state of every requirement
    Diagnose(DiagnoseArgs),

    /// Install, update, remove or inspect a single requirement
    Tool(ToolArgs),

    /// Add a directory to PATH for this and future shells
    Path(PathArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Apply the plan without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,

    /// Do not probe network connectivity before installing
    #[arg(long)]
    pub skip_network_check: bool,
}

/// Arguments for the `plan` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PlanArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `diagnose` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DiagnoseArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `tool` command.
#[derive(Debug, Clone, clap::Args)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .args(["install", "update", "uninstall", "diagnose"])
))]
pub struct ToolArgs {
    /// Requirement name (e.g. node, claude)
    pub name: String,

    /// Install if missing or below the minimum version
    #[arg(long)]
    pub install: bool,

    /// Upgrade even if already satisfied
    #[arg(long)]
    pub update: bool,

    /// Remove the tool through its backend
    #[arg(long)]
    pub uninstall: bool,

    /// Show the tool's status and selected backend
    #[arg(long)]
    pub diagnose: bool,

    /// Do not probe network connectivity before installing
    #[arg(long)]
    pub skip_network_check: bool,
}

/// The single operation selected on `envboot tool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOperation {
    Install,
    Update,
    Uninstall,
    Diagnose,
}

impl ToolArgs {
    pub fn operation(&self) -> ToolOperation {
        if self.install {
            ToolOperation::Install
        } else if self.update {
            ToolOperation::Update
        } else if self.uninstall {
            ToolOperation::Uninstall
        } else {
            ToolOperation::Diagnose
        }
    }
}

/// Arguments for the `path` command.
#[derive(Debug, Clone, clap::Args)]
pub struct PathArgs {
    /// Directory to put on PATH
    pub dir: PathBuf,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
