//! Windows Package Manager backend.
//!
//! Installers run by winget add their directories to the PATH stored in the
//! registry, which a running process never sees. [`WingetBackend::bin_dirs`]
//! re-reads that PATH so the executor can bring new entries into this run.

use super::{package_of, query, responds, run_installer, Backend, BackendKind};
use crate::error::Result;
use crate::probe::{extract_version, parse_system_path};
use crate::requirements::Requirement;
use crate::shell::CommandRunner;
use std::path::PathBuf;
use std::rc::Rc;

/// Flags that keep winget from stopping on license prompts.
const AGREEMENTS: &[&str] = &["--accept-source-agreements", "--accept-package-agreements"];

/// Machine then user PATH from the registry, with variables expanded.
const REGISTRY_PATH: &str = "[Environment]::GetEnvironmentVariable('Path','Machine')+';'+[Environment]::GetEnvironmentVariable('Path','User')";

pub struct WingetBackend {
    runner: Rc<dyn CommandRunner>,
}

impl WingetBackend {
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn winget(&self, requirement: &Requirement, verb: &str, agreements: bool) -> Result<()> {
        let id = package_of(BackendKind::Winget, requirement)?;
        let mut args = vec![verb, "--id", id, "-e", "--silent"];
        if agreements {
            args.extend_from_slice(AGREEMENTS);
        }
        run_installer(
            self.runner.as_ref(),
            BackendKind::Winget,
            &requirement.name,
            "winget",
            &args,
        )
    }

    /// Registry PATH entries missing from `session`.
    fn new_path_entries(&self, session: &[PathBuf]) -> Vec<PathBuf> {
        let Some(registry) = query(
            self.runner.as_ref(),
            "powershell",
            &["-NoProfile", "-Command", REGISTRY_PATH],
        ) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = Vec::new();
        for entry in registry.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let dir = PathBuf::from(entry);
            if !session.contains(&dir) && !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }
}

impl Backend for WingetBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Winget
    }

    fn is_available(&self) -> bool {
        responds(self.runner.as_ref(), "winget", "--version")
    }

    fn install(&self, requirement: &Requirement) -> Result<()> {
        self.winget(requirement, "install", true)
    }

    fn upgrade(&self, requirement: &Requirement) -> Result<()> {
        self.winget(requirement, "upgrade", true)
    }

    fn uninstall(&self, requirement: &Requirement) -> Result<()> {
        self.winget(requirement, "uninstall", false)
    }

    fn current_version(&self, package: &str) -> Option<String> {
        // Table output; the version column follows the id on its row.
        let out = query(
            self.runner.as_ref(),
            "winget",
            &["list", "--id", package, "-e", "--accept-source-agreements"],
        )?;
        out.lines()
            .find_map(|line| line.split_once(package).map(|(_, rest)| rest))
            .and_then(extract_version)
    }

    fn manual_command(&self, package: &str) -> String {
        format!("winget install --id {} -e", package)
    }

    fn bin_dirs(&self) -> Vec<PathBuf> {
        self.new_path_entries(&parse_system_path())
    }
}
