//! Tool command implementation.
//!
//! `envboot tool <name>` runs one operation against a single requirement.

use crate::cli::args::{ToolArgs, ToolOperation};
use crate::error::{EnvbootError, Result};
use crate::plan::{Action, PlanResult, Planner};
use crate::probe::detect_tool;
use crate::requirements::{find_requirement, Requirement};
use crate::ui::UserInterface;

use super::context::MachineContext;
use super::diagnose::{diagnose_tool, show_tool};
use super::dispatcher::{Command, CommandResult};
use super::display::summary;

/// The tool command implementation.
pub struct ToolCommand<'a> {
    ctx: &'a MachineContext,
    args: ToolArgs,
}

impl<'a> ToolCommand<'a> {
    pub fn new(ctx: &'a MachineContext, args: ToolArgs) -> Self {
        Self { ctx, args }
    }

    fn planner(&self) -> Planner<'a> {
        Planner::new(self.ctx.probe.as_ref(), &self.ctx.backends)
    }

    fn apply(&self, plan: &PlanResult, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = match self
            .ctx
            .executor(!self.args.skip_network_check)
            .execute(plan, ui)
        {
            Ok(report) => report,
            Err(e @ EnvbootError::Preflight { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };
        ui.show_summary(&summary(&report));
        Ok(CommandResult::from_success(report.success()))
    }

    fn install(&self, requirement: &Requirement, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let plan = self
            .planner()
            .plan(std::slice::from_ref(requirement), &self.ctx.platform);
        self.apply(&plan, ui)
    }

    /// Upgrade through the selected backend even when already satisfied.
    fn update(&self, requirement: &Requirement, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(backend) = self.planner().select_backend(requirement, &self.ctx.platform) else {
            ui.error(&format!(
                "No backend available for {} on {}",
                requirement.name, self.ctx.platform
            ));
            return Ok(CommandResult::failure(1));
        };

        let status = detect_tool(self.ctx.probe.as_ref(), requirement);
        let action = if status.installed {
            Action::Upgrade {
                requirement: requirement.clone(),
                backend,
                from: status.installed_version,
                to: "latest".to_string(),
            }
        } else {
            Action::Install {
                requirement: requirement.clone(),
                backend,
            }
        };
        self.apply(&PlanResult { actions: vec![action] }, ui)
    }

    fn uninstall(&self, requirement: &Requirement, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !detect_tool(self.ctx.probe.as_ref(), requirement).installed {
            ui.warning(&format!("{} is not installed", requirement.name));
            return Ok(CommandResult::success());
        }
        let backend = self
            .planner()
            .select_backend(requirement, &self.ctx.platform)
            .and_then(|kind| self.ctx.backends.get(kind));
        let Some(backend) = backend else {
            ui.error(&format!(
                "No backend available to remove {} on {}",
                requirement.name, self.ctx.platform
            ));
            return Ok(CommandResult::failure(1));
        };

        let mut spinner =
            ui.start_spinner(&format!("Removing {} via {}", requirement.name, backend.kind()));
        let mut result = Ok(());
        let mut work = || result = backend.uninstall(requirement);
        if backend.attaches_terminal() {
            spinner.suspend(&mut work);
        } else {
            work();
        }
        match result {
            Ok(()) => {
                spinner.finish_success(&format!("Removed {}", requirement.name));
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error(&format!("Could not remove {}", requirement.name));
                ui.show_error_block(&requirement.name, &e.to_string(), None);
                Ok(CommandResult::failure(1))
            }
        }
    }
}

impl Command for ToolCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let requirement = find_requirement(&self.ctx.requirements, &self.args.name)?;
        tracing::debug!("tool {} {:?}", requirement.name, self.args.operation());

        match self.args.operation() {
            ToolOperation::Install => self.install(requirement, ui),
            ToolOperation::Update => self.update(requirement, ui),
            ToolOperation::Uninstall => self.uninstall(requirement, ui),
            ToolOperation::Diagnose => {
                let diagnosis = diagnose_tool(self.ctx, &self.planner(), requirement);
                show_tool(ui, &diagnosis);
                Ok(CommandResult::success())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendKind, BackendSet, FakeBackend, FakeSystem};
    use crate::probe::{Arch, LinuxDistro, OsFamily, Platform, ShellKind};
    use crate::requirements::builtin_requirements;
    use crate::ui::MockUI;

    fn args(name: &str, operation: ToolOperation) -> ToolArgs {
        ToolArgs {
            name: name.to_string(),
            install: operation == ToolOperation::Install,
            update: operation == ToolOperation::Update,
            uninstall: operation == ToolOperation::Uninstall,
            diagnose: operation == ToolOperation::Diagnose,
            skip_network_check: false,
        }
    }

    fn context(system: &FakeSystem) -> MachineContext {
        let debian = Platform::new(OsFamily::Linux(LinuxDistro::Debian), Arch::X64, ShellKind::Bash);
        let backends = BackendSet::new()
            .with(Box::new(FakeBackend::new(BackendKind::Apt, system).installs_version("20.11.0")))
            .with(Box::new(FakeBackend::new(BackendKind::Npm, system).unavailable()));
        MachineContext::new(debian, builtin_requirements(), Box::new(system.clone()), backends)
            .with_network_probe(|| true)
    }

    #[test]
    fn install_touches_only_the_named_tool() {
        let system = FakeSystem::new();
        let ctx = context(&system);

        let mut ui = MockUI::new();
        let result = ToolCommand::new(&ctx, args("node", ToolOperation::Install))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(system.log(), vec!["apt install node"]);
        assert_eq!(ui.summaries()[0].rows.len(), 1);
    }

    #[test]
    fn update_upgrades_a_satisfied_tool() {
        let system = FakeSystem::new().with_tool("node", Some("20.1.0"));
        let ctx = context(&system);

        let mut ui = MockUI::new();
        let result = ToolCommand::new(&ctx, args("node", ToolOperation::Update))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(system.log(), vec!["apt upgrade node"]);
        assert_eq!(ui.summaries()[0].rows[0].label, "Upgraded");
    }

    #[test]
    fn update_without_backend_fails() {
        let system = FakeSystem::new();
        let ctx = context(&system);

        let mut ui = MockUI::new();
        let result = ToolCommand::new(&ctx, args("claude", ToolOperation::Update))
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("No backend available for claude"));
        assert!(system.log().is_empty());
    }

    #[test]
    fn uninstall_removes_through_backend() {
        let system = FakeSystem::new().with_tool("node", Some("20.1.0"));
        let ctx = context(&system);

        let mut ui = MockUI::new();
        let result = ToolCommand::new(&ctx, args("node", ToolOperation::Uninstall))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(system.log(), vec!["apt uninstall node"]);
        assert!(!detect_tool(&system, &builtin_requirements()[1]).installed);
    }

    #[test]
    fn uninstall_under_sudo_hides_spinner() {
        let system = FakeSystem::new().with_tool("node", Some("20.1.0"));
        let debian = Platform::new(OsFamily::Linux(LinuxDistro::Debian), Arch::X64, ShellKind::Bash);
        let backends = BackendSet::new().with(Box::new(
            FakeBackend::new(BackendKind::Apt, &system).attaching_terminal(),
        ));
        let ctx = MachineContext::new(debian, builtin_requirements(), Box::new(system.clone()), backends);

        let mut ui = MockUI::new();
        let result = ToolCommand::new(&ctx, args("node", ToolOperation::Uninstall))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.spinner_suspensions(), 1);
        assert_eq!(system.log(), vec!["apt uninstall node"]);
    }

    #[test]
    fn uninstall_of_missing_tool_is_a_no_op() {
        let system = FakeSystem::new();
        let ctx = context(&system);

        let mut ui = MockUI::new();
        let result = ToolCommand::new(&ctx, args("node", ToolOperation::Uninstall))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_warning("node is not installed"));
        assert!(system.log().is_empty());
    }

    #[test]
    fn diagnose_shows_selected_backend() {
        let system = FakeSystem::new();
        let ctx = context(&system);

        let mut ui = MockUI::new();
        ToolCommand::new(&ctx, args("node", ToolOperation::Diagnose))
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("node: not installed"));
        assert!(ui.has_message("backend:  apt"));
    }

    #[test]
    fn unknown_tool_is_an_error() {
        let system = FakeSystem::new();
        let ctx = context(&system);

        let mut ui = MockUI::new();
        let err = ToolCommand::new(&ctx, args("rustc", ToolOperation::Install))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, EnvbootError::UnknownRequirement { .. }));
    }
}
