//! Installed tool detection.
//!
//! A missing binary is a normal answer, not an error: probing never fails.

use super::path::{parse_system_path, resolve_tool_path};
use super::version::{extract_version, meets_minimum};
use crate::requirements::{Requirement, ToolStatus};
use crate::shell::{CommandRunner, SystemRunner};
use std::path::PathBuf;
use std::rc::Rc;

/// What a probe found for a binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// No binary with that name is reachable.
    Missing,
    /// The binary exists; its version may or may not be known.
    Installed { version: Option<String> },
}

/// Answers "is this binary installed, and at which version".
pub trait ToolProbe {
    /// Probe a single binary.
    fn probe(&self, command: &str) -> ProbeOutcome;
}

/// Probe the live machine: PATH lookup followed by `<binary> --version`.
pub struct SystemToolProbe {
    runner: Rc<dyn CommandRunner>,
    extra_dirs: Vec<PathBuf>,
}

impl SystemToolProbe {
    /// Create a probe backed by real processes.
    pub fn new() -> Self {
        Self::with_runner(Rc::new(SystemRunner))
    }

    /// Create a probe with a custom runner.
    pub fn with_runner(runner: Rc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            extra_dirs: Vec::new(),
        }
    }

    /// Also search these directories after PATH.
    pub fn with_extra_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.extra_dirs = dirs;
        self
    }
}

impl Default for SystemToolProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolProbe for SystemToolProbe {
    fn probe(&self, command: &str) -> ProbeOutcome {
        let mut search = parse_system_path();
        search.extend(self.extra_dirs.iter().cloned());

        let Some(binary) = resolve_tool_path(command, &search) else {
            tracing::debug!("{} not found on PATH", command);
            return ProbeOutcome::Missing;
        };

        let binary = binary.to_string_lossy().to_string();
        let version = match self.runner.run(&binary, &["--version"]) {
            Ok(result) if result.success => {
                extract_version(&result.stdout).or_else(|| extract_version(&result.stderr))
            }
            Ok(result) => {
                tracing::warn!(
                    "{} --version exited with {:?}; treating version as unknown",
                    binary,
                    result.exit_code
                );
                None
            }
            Err(e) => {
                tracing::warn!("Could not run {} --version: {}", binary, e);
                None
            }
        };

        ProbeOutcome::Installed { version }
    }
}

/// Probe a requirement and compare against its minimum version.
pub fn detect_tool(probe: &dyn ToolProbe, requirement: &Requirement) -> ToolStatus {
    match probe.probe(requirement.command()) {
        ProbeOutcome::Missing => ToolStatus::missing(&requirement.name),
        ProbeOutcome::Installed { version } => {
            // An unknown version compares as "0".
            let meets = meets_minimum(version.as_deref().unwrap_or(""), requirement.min_version);
            ToolStatus {
                requirement: requirement.name.clone(),
                installed: true,
                installed_version: version,
                meets_minimum: meets,
            }
        }
    }
}
