//! Plan command implementation.
//!
//! `envboot plan` shows what a run would do without changing anything.

use serde::Serialize;

use crate::cli::args::PlanArgs;
use crate::error::{EnvbootError, Result};
use crate::plan::{Action, Planner};
use crate::probe::Platform;
use crate::ui::UserInterface;

use super::context::MachineContext;
use super::dispatcher::{Command, CommandResult};
use super::display::plan_table;

/// JSON shape of `envboot plan --json`.
#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    platform: &'a Platform,
    actions: &'a [Action],
}

/// The plan command implementation.
pub struct PlanCommand<'a> {
    ctx: &'a MachineContext,
    args: PlanArgs,
}

impl<'a> PlanCommand<'a> {
    pub fn new(ctx: &'a MachineContext, args: PlanArgs) -> Self {
        Self { ctx, args }
    }

    /// The plan rendered as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        let plan = Planner::new(self.ctx.probe.as_ref(), &self.ctx.backends)
            .plan(&self.ctx.requirements, &self.ctx.platform);
        let output = PlanOutput {
            platform: &self.ctx.platform,
            actions: &plan.actions,
        };
        serde_json::to_string_pretty(&output).map_err(|e| EnvbootError::Other(e.into()))
    }
}

impl Command for PlanCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.json {
            println!("{}", self.to_json()?);
            return Ok(CommandResult::success());
        }

        let ctx = self.ctx;
        let plan = Planner::new(ctx.probe.as_ref(), &ctx.backends)
            .plan(&ctx.requirements, &ctx.platform);

        ui.show_header("Plan");
        ui.message(&format!("Platform: {}", ctx.platform));
        ui.message(&plan_table(&plan).render());

        match plan.work_count() {
            0 => ui.success("Nothing to do"),
            n => {
                ui.message(&format!("{} change(s) would be made", n));
                ui.show_hint("Run `envboot run` to apply");
            }
        }

        Ok(CommandResult::success())
    }
}
