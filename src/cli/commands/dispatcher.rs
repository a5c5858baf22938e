//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::EnvbootConfig;
use crate::error::Result;
use crate::ui::UserInterface;

use super::context::MachineContext;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, reporting through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success or exit code 1.
    pub fn from_success(success: bool) -> Self {
        if success {
            Self::success()
        } else {
            Self::failure(1)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config: EnvbootConfig,
}

impl CommandDispatcher {
    /// Create a dispatcher for a loaded configuration.
    pub fn new(config: EnvbootConfig) -> Self {
        Self { config }
    }

    /// Dispatch against the live machine.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Some(Commands::Completions(args)) = &cli.command {
            return super::completions::CompletionsCommand::new(args.clone()).execute(ui);
        }
        let ctx = MachineContext::system(self.config.clone(), ui.is_interactive());
        Self::dispatch_in(cli.command.as_ref(), &ctx, ui)
    }

    /// Dispatch against an explicit machine context.
    pub fn dispatch_in(
        command: Option<&Commands>,
        ctx: &MachineContext,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        match command {
            Some(Commands::Run(args)) => super::run::RunCommand::new(ctx, args.clone()).execute(ui),
            Some(Commands::Plan(args)) => {
                super::plan::PlanCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Diagnose(args)) => {
                super::diagnose::DiagnoseCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Tool(args)) => {
                super::tool::ToolCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Path(args)) => {
                super::path::PathCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::run::RunCommand::new(ctx, RunArgs::default()).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendKind, BackendSet, FakeBackend, FakeSystem};
    use crate::probe::{Arch, LinuxDistro, OsFamily, Platform, ShellKind};
    use crate::requirements::Requirement;
    use crate::ui::MockUI;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn no_subcommand_runs_the_bootstrap() {
        let system = FakeSystem::new();
        let backends = BackendSet::new().with(Box::new(FakeBackend::new(BackendKind::Pacman, &system)));
        let arch = Platform::new(OsFamily::Linux(LinuxDistro::Arch), Arch::X64, ShellKind::Zsh);
        let req = Requirement::new("rg").with_backend(BackendKind::Pacman, "ripgrep");
        let ctx = MachineContext::new(arch, vec![req], Box::new(system.clone()), backends)
            .with_network_probe(|| true);

        let mut ui = MockUI::new();
        let result = CommandDispatcher::dispatch_in(None, &ctx, &mut ui).unwrap();

        assert!(result.success);
        assert_eq!(system.log(), vec!["pacman install rg"]);
        assert_eq!(ui.summaries().len(), 1);
    }
}
