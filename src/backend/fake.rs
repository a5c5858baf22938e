//! In-memory machine and backend for exercising the planner and executor
//! without touching the host.
//!
//! A [`FakeSystem`] is shared by every [`FakeBackend`] built from it: it
//! answers tool probes, tracks which backends exist, holds a session PATH,
//! and records every backend operation in order.
//!
//! # Example
//!
//! ```
//! use envboot::backend::{Backend, BackendKind, FakeBackend, FakeSystem};
//! use envboot::probe::{ProbeOutcome, ToolProbe};
//! use envboot::requirements::Requirement;
//!
//! let system = FakeSystem::new();
//! let apt = FakeBackend::new(BackendKind::Apt, &system).installs_version("20.1.0");
//! let node = Requirement::new("node").with_backend(BackendKind::Apt, "nodejs");
//!
//! apt.install(&node).unwrap();
//! assert!(matches!(system.probe("node"), ProbeOutcome::Installed { .. }));
//! assert_eq!(system.log(), vec!["apt install node"]);
//! ```

use super::{Backend, BackendKind};
use crate::error::{EnvbootError, Result};
use crate::path::SessionEnv;
use crate::probe::{ProbeOutcome, ToolProbe};
use crate::requirements::Requirement;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Default)]
struct State {
    /// Tools visible regardless of PATH.
    tools: HashMap<String, Option<String>>,
    /// Tools installed into a directory; visible once it is on PATH.
    off_path: HashMap<String, (Option<String>, PathBuf)>,
    backends: HashSet<BackendKind>,
    path: Vec<PathBuf>,
    log: Vec<String>,
}

/// A simulated machine.
#[derive(Debug, Clone, Default)]
pub struct FakeSystem {
    state: Rc<RefCell<State>>,
}

impl FakeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a tool as installed at `version`.
    pub fn with_tool(self, command: &str, version: Option<&str>) -> Self {
        self.install_tool(command, version.map(str::to_string));
        self
    }

    fn install_tool(&self, command: &str, version: Option<String>) {
        self.state
            .borrow_mut()
            .tools
            .insert(command.to_string(), version);
    }

    fn remove_tool(&self, command: &str) {
        let mut state = self.state.borrow_mut();
        state.tools.remove(command);
        state.off_path.remove(command);
    }

    fn install_off_path(&self, command: &str, version: Option<String>, dir: PathBuf) {
        self.state
            .borrow_mut()
            .off_path
            .insert(command.to_string(), (version, dir));
    }

    /// Make a backend kind present or absent.
    pub fn set_backend(&self, kind: BackendKind, available: bool) {
        let mut state = self.state.borrow_mut();
        if available {
            state.backends.insert(kind);
        } else {
            state.backends.remove(&kind);
        }
    }

    fn has_backend(&self, kind: BackendKind) -> bool {
        self.state.borrow().backends.contains(&kind)
    }

    fn record(&self, entry: String) {
        self.state.borrow_mut().log.push(entry);
    }

    /// Backend operations performed so far, as "<backend> <verb> <requirement>".
    pub fn log(&self) -> Vec<String> {
        self.state.borrow().log.clone()
    }
}

impl ToolProbe for FakeSystem {
    fn probe(&self, command: &str) -> ProbeOutcome {
        let state = self.state.borrow();
        if let Some(version) = state.tools.get(command) {
            return ProbeOutcome::Installed {
                version: version.clone(),
            };
        }
        match state.off_path.get(command) {
            Some((version, dir)) if state.path.contains(dir) => ProbeOutcome::Installed {
                version: version.clone(),
            },
            _ => ProbeOutcome::Missing,
        }
    }
}

impl SessionEnv for FakeSystem {
    fn path_entries(&self) -> Vec<PathBuf> {
        self.state.borrow().path.clone()
    }

    fn set_path_entries(&self, entries: &[PathBuf]) -> Result<()> {
        self.state.borrow_mut().path = entries.to_vec();
        Ok(())
    }
}

/// A scripted backend operating on a [`FakeSystem`].
pub struct FakeBackend {
    kind: BackendKind,
    system: FakeSystem,
    version: String,
    failures: HashMap<String, String>,
    bin_dir: Option<PathBuf>,
    attaches_terminal: bool,
}

impl FakeBackend {
    /// Create an available backend of `kind`.
    pub fn new(kind: BackendKind, system: &FakeSystem) -> Self {
        system.set_backend(kind, true);
        Self {
            kind,
            system: system.clone(),
            version: "99.0.0".to_string(),
            failures: HashMap::new(),
            bin_dir: None,
            attaches_terminal: false,
        }
    }

    /// Mark this backend as not present on the machine.
    pub fn unavailable(self) -> Self {
        self.system.set_backend(self.kind, false);
        self
    }

    /// Version reported for tools this backend installs.
    pub fn installs_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Fail every operation on `requirement` with `message`.
    pub fn failing_on(mut self, requirement: &str, message: &str) -> Self {
        self.failures
            .insert(requirement.to_string(), message.to_string());
        self
    }

    /// Install into `dir`, which is not on PATH until someone adds it.
    pub fn installing_into(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = Some(dir.into());
        self
    }

    /// Behave like an installer that may prompt on the terminal.
    pub fn attaching_terminal(mut self) -> Self {
        self.attaches_terminal = true;
        self
    }

    fn operate(&self, verb: &str, requirement: &Requirement) -> Result<()> {
        self.system
            .record(format!("{} {} {}", self.kind, verb, requirement.name));

        if !self.system.has_backend(self.kind) {
            return Err(EnvbootError::BackendUnavailable {
                backend: self.kind.to_string(),
            });
        }
        if let Some(message) = self.failures.get(&requirement.name) {
            return Err(EnvbootError::BackendFailed {
                backend: self.kind.to_string(),
                requirement: requirement.name.clone(),
                message: message.clone(),
            });
        }
        Ok(())
    }

    fn put(&self, requirement: &Requirement) {
        let version = Some(self.version.clone());
        match &self.bin_dir {
            Some(dir) => self
                .system
                .install_off_path(requirement.command(), version, dir.clone()),
            None => self.system.install_tool(requirement.command(), version),
        }
        if let Some(provided) = requirement.provides {
            self.system.set_backend(provided, true);
        }
    }
}

impl Backend for FakeBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.system.has_backend(self.kind)
    }

    fn install(&self, requirement: &Requirement) -> Result<()> {
        self.operate("install", requirement)?;
        self.put(requirement);
        Ok(())
    }

    fn upgrade(&self, requirement: &Requirement) -> Result<()> {
        self.operate("upgrade", requirement)?;
        self.put(requirement);
        Ok(())
    }

    fn uninstall(&self, requirement: &Requirement) -> Result<()> {
        self.operate("uninstall", requirement)?;
        self.system.remove_tool(requirement.command());
        Ok(())
    }

    fn current_version(&self, _package: &str) -> Option<String> {
        None
    }

    fn manual_command(&self, package: &str) -> String {
        format!("{} install {}", self.kind, package)
    }

    fn bin_dir(&self) -> Option<PathBuf> {
        self.bin_dir.clone()
    }

    fn attaches_terminal(&self) -> bool {
        self.attaches_terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_makes_tool_visible_and_enables_provided_backend() {
        let system = FakeSystem::new();
        let apt = FakeBackend::new(BackendKind::Apt, &system);
        let node = Requirement::new("node").providing(BackendKind::Npm);

        assert!(!system.has_backend(BackendKind::Npm));
        apt.install(&node).unwrap();

        assert!(system.has_backend(BackendKind::Npm));
        assert_eq!(
            system.probe("node"),
            ProbeOutcome::Installed {
                version: Some("99.0.0".to_string())
            }
        );
    }

    #[test]
    fn failing_backend_leaves_system_untouched() {
        let system = FakeSystem::new();
        let apt = FakeBackend::new(BackendKind::Apt, &system).failing_on("node", "boom");

        assert!(apt.install(&Requirement::new("node")).is_err());
        assert_eq!(system.probe("node"), ProbeOutcome::Missing);
        assert_eq!(system.log(), vec!["apt install node"]);
    }

    #[test]
    fn off_path_install_visible_after_path_update() {
        let system = FakeSystem::new();
        let npm = FakeBackend::new(BackendKind::Npm, &system).installing_into("/fake/npm/bin");
        npm.install(&Requirement::new("claude")).unwrap();

        assert_eq!(system.probe("claude"), ProbeOutcome::Missing);
        system
            .set_path_entries(&[PathBuf::from("/fake/npm/bin")])
            .unwrap();
        assert!(matches!(system.probe("claude"), ProbeOutcome::Installed { .. }));
    }

    #[test]
    fn uninstall_removes_tool() {
        let system = FakeSystem::new().with_tool("node", Some("20.0.0"));
        let apt = FakeBackend::new(BackendKind::Apt, &system);
        apt.uninstall(&Requirement::new("node")).unwrap();
        assert_eq!(system.probe("node"), ProbeOutcome::Missing);
    }
}
