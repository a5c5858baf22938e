//! Run command implementation.
//!
//! `envboot run` detects, plans, optionally confirms, executes, verifies and
//! prints the summary.

use crate::cli::args::RunArgs;
use crate::error::{EnvbootError, Result};
use crate::plan::Planner;
use crate::ui::{Prompt, UserInterface};

use super::context::MachineContext;
use super::dispatcher::{Command, CommandResult};
use super::display::{plan_table, summary};

/// The run command implementation.
pub struct RunCommand<'a> {
    ctx: &'a MachineContext,
    args: RunArgs,
}

impl<'a> RunCommand<'a> {
    pub fn new(ctx: &'a MachineContext, args: RunArgs) -> Self {
        Self { ctx, args }
    }

    /// Put configured extra directories on PATH.
    fn ensure_path_dirs(&self, ui: &mut dyn UserInterface) {
        let Some(mutator) = &self.ctx.path else {
            return;
        };
        for dir in self.ctx.path_dirs() {
            match mutator.ensure_on_path(&dir) {
                Ok(update) if update.persisted => ui.message(&format!(
                    "Added {} to PATH in {}",
                    dir.display(),
                    mutator.config_file().display()
                )),
                Ok(_) => tracing::debug!("{} already on PATH", dir.display()),
                Err(e) => ui.warning(&format!("Could not add {} to PATH: {}", dir.display(), e)),
            }
        }
    }
}

impl Command for RunCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.ctx;
        ui.show_header("Bootstrapping environment");
        ui.message(&format!("Platform: {}", ctx.platform));

        let plan = Planner::new(ctx.probe.as_ref(), &ctx.backends)
            .plan(&ctx.requirements, &ctx.platform);

        if plan.has_work() && !self.args.yes && ui.is_interactive() {
            ui.message(&plan_table(&plan).render());
            let prompt = Prompt::new(
                "proceed",
                format!("Apply {} change(s)?", plan.work_count()),
                true,
            );
            if !ui.confirm(&prompt)? {
                ui.warning("Nothing was changed");
                return Ok(CommandResult::success());
            }
        }

        let report = match ctx.executor(!self.args.skip_network_check).execute(&plan, ui) {
            Ok(report) => report,
            Err(e @ EnvbootError::Preflight { .. }) => {
                ui.error(&e.to_string());
                if !self.args.skip_network_check {
                    ui.show_hint("Pass --skip-network-check to install from a local mirror");
                }
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        self.ensure_path_dirs(ui);
        ui.show_summary(&summary(&report));

        Ok(CommandResult::from_success(report.success()))
    }
}
