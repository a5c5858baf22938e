//! Runs a plan against the machine.

use super::network::network_reachable;
use super::report::{ActionReport, ExecutionReport, FinalStatus, Outcome, Verification};
use crate::backend::{candidates, Backend, BackendKind, BackendSet};
use crate::error::{EnvbootError, Result};
use crate::path::{PathMutator, PathUpdate};
use crate::plan::{Action, PlanResult, SkipReason};
use crate::probe::{detect_tool, Platform, ToolProbe};
use crate::requirements::{Requirement, ToolStatus};
use crate::ui::{SpinnerHandle, UserInterface};
use std::path::PathBuf;

/// Executes plans sequentially, one action at a time.
///
/// A failing action never stops the run. Only pre-flight problems, found
/// before anything is touched, abort it.
pub struct Executor<'a> {
    backends: &'a BackendSet,
    probe: &'a dyn ToolProbe,
    platform: Platform,
    path: Option<&'a PathMutator>,
    check_network: bool,
    network: Box<dyn Fn() -> bool + 'a>,
}

impl<'a> Executor<'a> {
    pub fn new(backends: &'a BackendSet, probe: &'a dyn ToolProbe, platform: Platform) -> Self {
        Self {
            backends,
            probe,
            platform,
            path: None,
            check_network: true,
            network: Box::new(network_reachable),
        }
    }

    /// Fix up PATH for tools that install outside it.
    pub fn with_path_mutator(mut self, mutator: &'a PathMutator) -> Self {
        self.path = Some(mutator);
        self
    }

    /// Replace the connectivity probe.
    pub fn with_network_probe(mut self, probe: impl Fn() -> bool + 'a) -> Self {
        self.network = Box::new(probe);
        self
    }

    /// Enable or disable the connectivity pre-flight.
    pub fn check_network(mut self, enabled: bool) -> Self {
        self.check_network = enabled;
        self
    }

    /// Run every action in plan order, then re-probe every requirement.
    pub fn execute(
        &self,
        plan: &PlanResult,
        ui: &mut dyn UserInterface,
    ) -> Result<ExecutionReport> {
        self.preflight(plan)?;

        let actions: Vec<ActionReport> = plan
            .actions
            .iter()
            .map(|action| self.run_action(action, ui))
            .collect();

        let verification = actions
            .iter()
            .map(|report| {
                let status = detect_tool(self.probe, report.action.requirement());
                Verification {
                    final_status: FinalStatus::derive(report, &status),
                    status,
                }
            })
            .collect();

        Ok(ExecutionReport {
            actions,
            verification,
        })
    }

    /// Conditions that make the whole run pointless.
    fn preflight(&self, plan: &PlanResult) -> Result<()> {
        if plan.has_work() {
            if self.check_network && !(self.network)() {
                return Err(EnvbootError::Preflight {
                    reason: "no network connectivity; installers need to download packages"
                        .to_string(),
                });
            }
            return Ok(());
        }

        if plan.has_skip(SkipReason::NoBackendAvailable) {
            let system: Vec<BackendKind> = candidates(&self.platform)
                .into_iter()
                .filter(BackendKind::is_system)
                .collect();
            if !self.backends.any_available(&system) {
                return Err(EnvbootError::Preflight {
                    reason: format!(
                        "no supported package manager found on {}",
                        self.platform
                    ),
                });
            }
        }
        Ok(())
    }

    fn run_action(&self, action: &Action, ui: &mut dyn UserInterface) -> ActionReport {
        let Some(kind) = action.backend() else {
            tracing::debug!("{}", action);
            return ActionReport::skipped(action);
        };
        let requirement = action.requirement();

        let verb = match action {
            Action::Upgrade { .. } => "Upgrading",
            _ => "Installing",
        };
        let mut spinner = ui.start_spinner(&format!("{} {} via {}", verb, requirement.name, kind));
        tracing::info!("Running: {}", action);

        let backend = match self.backends.get(kind) {
            Some(b) if b.is_available() => b,
            _ => {
                let err = EnvbootError::BackendUnavailable {
                    backend: kind.to_string(),
                };
                return self.failed(action, None, err.to_string(), spinner.as_mut(), ui);
            }
        };

        let mut result = Ok(());
        let mut work = || {
            result = match action {
                Action::Upgrade { .. } => backend.upgrade(requirement),
                _ => backend.install(requirement),
            };
        };
        if backend.attaches_terminal() {
            spinner.suspend(&mut work);
        } else {
            work();
        }
        if let Err(e) = result {
            return self.failed(action, Some(backend), e.to_string(), spinner.as_mut(), ui);
        }

        let (status, path_update) = self.expose(requirement, backend, ui);

        if status.installed && !status.meets_minimum {
            let message = format!(
                "{} {} is installed but at least {} is required",
                requirement.name,
                status.version_label(),
                requirement.min_version.unwrap_or_default()
            );
            let mut report = self.failed(action, Some(backend), message, spinner.as_mut(), ui);
            report.path_update = path_update;
            return report;
        }

        if status.installed {
            spinner.finish_success(&format!(
                "{} {} ({})",
                requirement.name,
                if verb == "Upgrading" { "upgraded" } else { "installed" },
                status.version_label()
            ));
        } else {
            spinner.finish_success(&format!("{} installed (not on PATH)", requirement.name));
            ui.warning(&format!(
                "{} was installed but is not on PATH; open a new shell or add its directory manually",
                requirement.name
            ));
        }

        ActionReport {
            action: action.clone(),
            outcome: Outcome::Succeeded,
            path_update,
            remediation: None,
        }
    }

    /// Re-probe after a successful install and, if the binary is still
    /// invisible, put the backend's bin directories on PATH.
    fn expose(
        &self,
        requirement: &Requirement,
        used: &dyn Backend,
        ui: &mut dyn UserInterface,
    ) -> (ToolStatus, Option<PathUpdate>) {
        let status = detect_tool(self.probe, requirement);
        let Some(mutator) = self.path else {
            return (status, None);
        };
        if status.installed {
            return (status, None);
        }

        let mut dirs: Vec<PathBuf> = Vec::new();
        let provided = requirement.provides.and_then(|k| self.backends.get(k));
        for backend in std::iter::once(used).chain(provided) {
            for dir in backend.bin_dirs() {
                if !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
        }

        let mut last_update = None;
        for dir in dirs {
            match mutator.ensure_on_path(&dir) {
                Ok(update) => {
                    if update.persisted {
                        ui.message(&format!(
                            "Added {} to PATH in {}",
                            dir.display(),
                            mutator.config_file().display()
                        ));
                    }
                    last_update = Some(update);
                }
                Err(e) => {
                    tracing::warn!("Could not add {} to PATH: {}", dir.display(), e);
                    continue;
                }
            }
            let status = detect_tool(self.probe, requirement);
            if status.installed {
                return (status, last_update);
            }
        }

        (status, last_update)
    }

    fn failed(
        &self,
        action: &Action,
        backend: Option<&dyn Backend>,
        message: String,
        spinner: &mut dyn SpinnerHandle,
        ui: &mut dyn UserInterface,
    ) -> ActionReport {
        let requirement = action.requirement();
        tracing::warn!("{} failed: {}", action, message);
        spinner.finish_error(&format!("{} failed", requirement.name));

        let remediation = remediation(requirement, backend);
        ui.show_error_block(&action.to_string(), &message, remediation.as_deref());

        ActionReport {
            action: action.clone(),
            outcome: Outcome::Failed(message),
            path_update: None,
            remediation,
        }
    }
}

/// The manual install command for a requirement: the backend's own command
/// line when known, otherwise the requirement's hint.
pub fn remediation(requirement: &Requirement, backend: Option<&dyn Backend>) -> Option<String> {
    backend
        .and_then(|b| {
            requirement
                .package_for(b.kind())
                .map(|package| b.manual_command(package))
        })
        .or_else(|| requirement.manual_hint.clone())
}
