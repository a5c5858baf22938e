//! Arch Linux `pacman` backend.

use super::{package_of, query, responds, run_privileged, Backend, BackendKind};
use crate::error::Result;
use crate::requirements::Requirement;
use crate::shell::CommandRunner;
use std::rc::Rc;

pub struct PacmanBackend {
    runner: Rc<dyn CommandRunner>,
    use_sudo: bool,
}

impl PacmanBackend {
    pub fn new(runner: Rc<dyn CommandRunner>, use_sudo: bool) -> Self {
        Self { runner, use_sudo }
    }

    fn pacman(&self, requirement: &Requirement, args: &[&str]) -> Result<()> {
        let package = package_of(BackendKind::Pacman, requirement)?;
        let mut full = args.to_vec();
        full.push(package);
        run_privileged(
            self.runner.as_ref(),
            BackendKind::Pacman,
            self.use_sudo,
            &requirement.name,
            "pacman",
            &full,
        )
    }
}

impl Backend for PacmanBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Pacman
    }

    fn is_available(&self) -> bool {
        responds(self.runner.as_ref(), "pacman", "--version")
    }

    fn install(&self, requirement: &Requirement) -> Result<()> {
        self.pacman(requirement, &["-S", "--noconfirm", "--needed"])
    }

    fn upgrade(&self, requirement: &Requirement) -> Result<()> {
        // Arch does not support partial upgrades; refresh and upgrade together.
        self.pacman(requirement, &["-Syu", "--noconfirm"])
    }

    fn uninstall(&self, requirement: &Requirement) -> Result<()> {
        self.pacman(requirement, &["-R", "--noconfirm"])
    }

    fn current_version(&self, package: &str) -> Option<String> {
        // "nodejs 21.6.1-1"
        let out = query(self.runner.as_ref(), "pacman", &["-Q", package])?;
        out.split_whitespace().nth(1).map(str::to_string)
    }

    fn manual_command(&self, package: &str) -> String {
        format!("sudo pacman -S --needed {}", package)
    }

    fn attaches_terminal(&self) -> bool {
        self.use_sudo
    }
}
