//! Homebrew backend (macOS and Linuxbrew).

use super::{package_of, query, responds, run_installer, Backend, BackendKind};
use crate::error::{EnvbootError, Result};
use crate::requirements::Requirement;
use crate::shell::CommandRunner;
use std::path::PathBuf;
use std::rc::Rc;

/// Where the Homebrew installer puts itself. A fresh install is usually not
/// on PATH yet, so these are searched directly.
const KNOWN_PREFIXES: &[&str] = &["/opt/homebrew", "/usr/local", "/home/linuxbrew/.linuxbrew"];

/// Installs formulae with `brew`.
pub struct HomebrewBackend {
    runner: Rc<dyn CommandRunner>,
    prefixes: Vec<PathBuf>,
}

impl HomebrewBackend {
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            prefixes: KNOWN_PREFIXES.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace the prefixes searched when `brew` is not on PATH.
    pub fn with_prefixes(mut self, prefixes: Vec<PathBuf>) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// The `brew` executable to invoke: from PATH, else from a known prefix.
    fn brew(&self) -> Option<String> {
        if responds(self.runner.as_ref(), "brew", "--version") {
            return Some("brew".to_string());
        }
        self.prefixes
            .iter()
            .map(|p| p.join("bin").join("brew"))
            .find(|p| p.is_file())
            .map(|p| p.to_string_lossy().to_string())
    }

    fn brew_or_unavailable(&self) -> Result<String> {
        self.brew().ok_or_else(|| EnvbootError::BackendUnavailable {
            backend: BackendKind::Homebrew.to_string(),
        })
    }

    fn run(&self, requirement: &Requirement, verb: &str) -> Result<()> {
        let package = package_of(BackendKind::Homebrew, requirement)?;
        let brew = self.brew_or_unavailable()?;
        run_installer(
            self.runner.as_ref(),
            BackendKind::Homebrew,
            &requirement.name,
            &brew,
            &[verb, package],
        )
    }
}

impl Backend for HomebrewBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Homebrew
    }

    fn is_available(&self) -> bool {
        self.brew().is_some()
    }

    fn install(&self, requirement: &Requirement) -> Result<()> {
        self.run(requirement, "install")
    }

    fn upgrade(&self, requirement: &Requirement) -> Result<()> {
        self.run(requirement, "upgrade")
    }

    fn uninstall(&self, requirement: &Requirement) -> Result<()> {
        self.run(requirement, "uninstall")
    }

    fn current_version(&self, package: &str) -> Option<String> {
        let brew = self.brew()?;
        // "node 20.11.1 20.10.0": newest first
        let out = query(self.runner.as_ref(), &brew, &["list", "--versions", package])?;
        out.split_whitespace().nth(1).map(str::to_string)
    }

    fn manual_command(&self, package: &str) -> String {
        format!("brew install {}", package)
    }

    fn bin_dir(&self) -> Option<PathBuf> {
        if let Some(prefix) = query(self.runner.as_ref(), "brew", &["--prefix"]) {
            return Some(PathBuf::from(prefix).join("bin"));
        }
        self.prefixes
            .iter()
            .map(|p| p.join("bin"))
            .find(|bin| bin.join("brew").is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ScriptedRunner;
    use std::fs;
    use tempfile::TempDir;

    fn node() -> Requirement {
        Requirement::new("node").with_backend(BackendKind::Homebrew, "node")
    }

    #[test]
    fn installs_formula_when_brew_on_path() {
        let runner = Rc::new(
            ScriptedRunner::new()
                .with_success("brew --version", "Homebrew 4.2.0")
                .with_success("brew install node", ""),
        );
        let backend = HomebrewBackend::new(runner.clone()).with_prefixes(vec![]);

        backend.install(&node()).unwrap();
        assert!(runner.calls().contains(&"brew install node".to_string()));
    }

    #[test]
    fn unavailable_without_brew() {
        let runner = Rc::new(ScriptedRunner::new());
        let backend = HomebrewBackend::new(runner).with_prefixes(vec![]);

        assert!(!backend.is_available());
        assert!(matches!(
            backend.install(&node()),
            Err(EnvbootError::BackendUnavailable { .. })
        ));
    }

    #[test]
    fn finds_brew_under_known_prefix() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("brew"), "#!/bin/sh\n").unwrap();

        let backend = HomebrewBackend::new(Rc::new(ScriptedRunner::new()))
            .with_prefixes(vec![temp.path().to_path_buf()]);

        assert!(backend.is_available());
        assert_eq!(backend.bin_dir(), Some(bin));
    }

    #[test]
    fn current_version_reads_newest() {
        let runner = Rc::new(
            ScriptedRunner::new()
                .with_success("brew --version", "Homebrew 4.2.0")
                .with_success("brew list --versions node", "node 20.11.1 20.10.0\n"),
        );
        let backend = HomebrewBackend::new(runner).with_prefixes(vec![]);
        assert_eq!(backend.current_version("node").as_deref(), Some("20.11.1"));
    }

    #[test]
    fn missing_package_declaration_is_error() {
        let runner = Rc::new(ScriptedRunner::new().with_success("brew --version", "Homebrew"));
        let backend = HomebrewBackend::new(runner).with_prefixes(vec![]);
        let err = backend.install(&Requirement::new("node")).unwrap_err();
        assert!(err.to_string().contains("declares no package for homebrew"));
    }

    #[test]
    fn manual_command_is_copy_pasteable() {
        let backend = HomebrewBackend::new(Rc::new(ScriptedRunner::new()));
        assert_eq!(backend.manual_command("node"), "brew install node");
    }
}
