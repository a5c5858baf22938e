//! Installer scripts run through the platform shell.
//!
//! The requirement's "package" for this backend is the script itself, such
//! as Homebrew's `curl | bash` one-liner.
//!
//! On an interactive terminal the script's output and prompts go straight
//! to the user. Otherwise output is captured and `NONINTERACTIVE=1` is set,
//! which installers such as Homebrew's honor by skipping their
//! confirmation prompts.

use super::{package_of, Backend, BackendKind};
use crate::error::{EnvbootError, Result};
use crate::probe::{parse_system_path, resolve_tool_path};
use crate::requirements::Requirement;
use crate::shell::{CommandOptions, CommandRunner};
use std::rc::Rc;

pub struct ScriptBackend {
    runner: Rc<dyn CommandRunner>,
    interactive: bool,
}

impl ScriptBackend {
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            interactive: false,
        }
    }

    /// Let scripts talk to the user's terminal.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    fn options(&self) -> CommandOptions {
        if self.interactive {
            CommandOptions::attached()
        } else {
            CommandOptions::captured().with_env("NONINTERACTIVE", "1")
        }
    }

    fn run_script(&self, requirement: &Requirement) -> Result<()> {
        let script = package_of(BackendKind::Script, requirement)?;
        tracing::info!("script: {}", script);

        let failed = |message: String| EnvbootError::BackendFailed {
            backend: BackendKind::Script.to_string(),
            requirement: requirement.name.clone(),
            message,
        };

        let result = self
            .runner
            .run_shell_with(script, &self.options())
            .map_err(|e| failed(e.to_string()))?;
        if result.success {
            Ok(())
        } else {
            Err(failed(format!(
                "install script exited with {:?}: {}",
                result.exit_code,
                result.diagnostic()
            )))
        }
    }
}

impl Backend for ScriptBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Script
    }

    fn is_available(&self) -> bool {
        let shell = if cfg!(windows) { "powershell" } else { "sh" };
        resolve_tool_path(shell, &parse_system_path()).is_some()
    }

    fn install(&self, requirement: &Requirement) -> Result<()> {
        self.run_script(requirement)
    }

    /// Installer scripts fetch the latest release, so re-running upgrades.
    fn upgrade(&self, requirement: &Requirement) -> Result<()> {
        self.run_script(requirement)
    }

    fn uninstall(&self, _requirement: &Requirement) -> Result<()> {
        Err(EnvbootError::Unsupported {
            backend: BackendKind::Script.to_string(),
            operation: "uninstall".to_string(),
        })
    }

    fn current_version(&self, _package: &str) -> Option<String> {
        None
    }

    fn manual_command(&self, package: &str) -> String {
        package.to_string()
    }

    fn attaches_terminal(&self) -> bool {
        self.interactive
    }
}
