//! Diagnose command implementation.
//!
//! `envboot diagnose` reports the detected platform, which package managers
//! are present, and the probed state of every requirement.

use serde::Serialize;

use crate::backend::BackendKind;
use crate::cli::args::DiagnoseArgs;
use crate::error::{EnvbootError, Result};
use crate::plan::Planner;
use crate::probe::{detect_tool, Platform};
use crate::requirements::{Requirement, ToolStatus};
use crate::ui::{Table, UserInterface};

use super::context::MachineContext;
use super::dispatcher::{Command, CommandResult};

/// Probed state of one requirement.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDiagnosis {
    #[serde(flatten)]
    pub status: ToolStatus,
    pub command: String,
    pub min_version: Option<u32>,
    /// Backend a run would use right now.
    pub backend: Option<BackendKind>,
    /// Version recorded by that backend, which can differ from the binary
    /// found on PATH.
    pub backend_version: Option<String>,
}

/// JSON shape of `envboot diagnose --json`.
#[derive(Debug, Serialize)]
pub struct Diagnosis<'a> {
    pub platform: &'a Platform,
    pub available_backends: Vec<BackendKind>,
    pub shell_config: Option<String>,
    pub tools: Vec<ToolDiagnosis>,
}

/// Probe one requirement and the backend that would handle it.
pub fn diagnose_tool(ctx: &MachineContext, planner: &Planner<'_>, requirement: &Requirement) -> ToolDiagnosis {
    let backend = planner.select_backend(requirement, &ctx.platform);
    let backend_version = backend.and_then(|kind| {
        let package = requirement.package_for(kind)?;
        ctx.backends.get(kind)?.current_version(package)
    });
    ToolDiagnosis {
        status: detect_tool(ctx.probe.as_ref(), requirement),
        command: requirement.command().to_string(),
        min_version: requirement.min_version,
        backend,
        backend_version,
    }
}

/// Print one diagnosis as a block of fields.
pub fn show_tool(ui: &mut dyn UserInterface, diagnosis: &ToolDiagnosis) {
    let status = &diagnosis.status;
    let state = match (status.installed, status.meets_minimum) {
        (false, _) => "not installed",
        (true, true) => "installed",
        (true, false) => "installed, below minimum",
    };
    ui.message(&format!("{}: {}", status.requirement, state));
    ui.message(&format!("  command:  {}", diagnosis.command));
    ui.message(&format!("  version:  {}", status.version_label()));
    if let Some(min) = diagnosis.min_version {
        ui.message(&format!("  minimum:  {}", min));
    }
    ui.message(&format!(
        "  backend:  {}",
        diagnosis
            .backend
            .map(|b| b.to_string())
            .unwrap_or_else(|| "none available".to_string())
    ));
    if let Some(version) = &diagnosis.backend_version {
        ui.message(&format!("  recorded: {}", version));
    }
}

/// The diagnose command implementation.
pub struct DiagnoseCommand<'a> {
    ctx: &'a MachineContext,
    args: DiagnoseArgs,
}

impl<'a> DiagnoseCommand<'a> {
    pub fn new(ctx: &'a MachineContext, args: DiagnoseArgs) -> Self {
        Self { ctx, args }
    }

    pub fn diagnose(&self) -> Diagnosis<'a> {
        let ctx = self.ctx;
        let planner = Planner::new(ctx.probe.as_ref(), &ctx.backends);
        Diagnosis {
            platform: &ctx.platform,
            available_backends: BackendKind::ALL
                .into_iter()
                .filter(|k| ctx.backends.get(*k).is_some_and(|b| b.is_available()))
                .collect(),
            shell_config: ctx
                .path
                .as_ref()
                .map(|m| m.config_file().display().to_string()),
            tools: ctx
                .requirements
                .iter()
                .map(|r| diagnose_tool(ctx, &planner, r))
                .collect(),
        }
    }
}

impl Command for DiagnoseCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let diagnosis = self.diagnose();

        if self.args.json {
            let json = serde_json::to_string_pretty(&diagnosis)
                .map_err(|e| EnvbootError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        ui.show_header("Diagnosis");
        ui.message(&format!("Platform:         {}", diagnosis.platform));
        let managers: Vec<&str> = diagnosis
            .available_backends
            .iter()
            .map(|k| k.as_str())
            .collect();
        ui.message(&format!(
            "Package managers: {}",
            if managers.is_empty() {
                "none".to_string()
            } else {
                managers.join(", ")
            }
        ));
        if let Some(file) = &diagnosis.shell_config {
            ui.message(&format!("Shell config:     {}", file));
        }

        let mut table = Table::new(&["Tool", "Installed", "Version", "Minimum", "Backend"]);
        for tool in &diagnosis.tools {
            table.add_row(vec![
                tool.status.requirement.clone(),
                if tool.status.installed { "yes" } else { "no" }.to_string(),
                tool.status.version_label().to_string(),
                tool.min_version
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                tool.backend
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        ui.message(&table.render());

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendSet, FakeBackend, FakeSystem};
    use crate::probe::{Arch, LinuxDistro, OsFamily, ShellKind};
    use crate::requirements::builtin_requirements;
    use crate::ui::MockUI;

    fn context(system: &FakeSystem) -> MachineContext {
        let fedora = Platform::new(OsFamily::Linux(LinuxDistro::Fedora), Arch::X64, ShellKind::Bash);
        let backends = BackendSet::new()
            .with(Box::new(FakeBackend::new(BackendKind::Dnf, system)))
            .with(Box::new(FakeBackend::new(BackendKind::Npm, system).unavailable()));
        MachineContext::new(fedora, builtin_requirements(), Box::new(system.clone()), backends)
    }

    #[test]
    fn reports_status_and_backend_for_every_requirement() {
        let system = FakeSystem::new().with_tool("node", Some("16.20.2"));
        let ctx = context(&system);

        let diagnosis = DiagnoseCommand::new(&ctx, DiagnoseArgs::default()).diagnose();

        assert_eq!(diagnosis.available_backends, vec![BackendKind::Dnf]);
        assert_eq!(diagnosis.tools.len(), 3);
        let node = &diagnosis.tools[1];
        assert!(node.status.installed);
        assert!(!node.status.meets_minimum);
        assert_eq!(node.backend, Some(BackendKind::Dnf));
        let claude = &diagnosis.tools[2];
        assert!(!claude.status.installed);
        assert_eq!(claude.backend, None);
    }

    #[test]
    fn json_flattens_status() {
        let system = FakeSystem::new();
        let ctx = context(&system);
        let diagnosis = DiagnoseCommand::new(&ctx, DiagnoseArgs { json: true }).diagnose();

        let value = serde_json::to_value(&diagnosis).unwrap();
        assert_eq!(value["tools"][1]["requirement"], "node");
        assert_eq!(value["tools"][1]["installed"], false);
        assert_eq!(value["available_backends"][0], "dnf");
    }

    #[test]
    fn human_output_lists_managers() {
        let system = FakeSystem::new();
        let ctx = context(&system);

        let mut ui = MockUI::new();
        DiagnoseCommand::new(&ctx, DiagnoseArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_message("Package managers: dnf"));
        assert!(system.log().is_empty());
    }
}
