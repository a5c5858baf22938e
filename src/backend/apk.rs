//! Alpine Linux `apk` backend.

use super::{package_of, query, responds, run_privileged, Backend, BackendKind};
use crate::error::Result;
use crate::probe::extract_version;
use crate::requirements::Requirement;
use crate::shell::CommandRunner;
use std::rc::Rc;

pub struct ApkBackend {
    runner: Rc<dyn CommandRunner>,
    use_sudo: bool,
}

impl ApkBackend {
    pub fn new(runner: Rc<dyn CommandRunner>, use_sudo: bool) -> Self {
        Self { runner, use_sudo }
    }

    fn apk(&self, requirement: &Requirement, args: &[&str]) -> Result<()> {
        let package = package_of(BackendKind::Apk, requirement)?;
        let mut full = args.to_vec();
        full.push(package);
        run_privileged(
            self.runner.as_ref(),
            BackendKind::Apk,
            self.use_sudo,
            &requirement.name,
            "apk",
            &full,
        )
    }
}

impl Backend for ApkBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Apk
    }

    fn is_available(&self) -> bool {
        responds(self.runner.as_ref(), "apk", "--version")
    }

    fn install(&self, requirement: &Requirement) -> Result<()> {
        self.apk(requirement, &["add", "--no-cache"])
    }

    fn upgrade(&self, requirement: &Requirement) -> Result<()> {
        self.apk(requirement, &["add", "--no-cache", "--upgrade"])
    }

    fn uninstall(&self, requirement: &Requirement) -> Result<()> {
        self.apk(requirement, &["del"])
    }

    fn current_version(&self, package: &str) -> Option<String> {
        // "nodejs-20.11.1-r0 x86_64 {nodejs} (MIT) [installed]"
        let out = query(
            self.runner.as_ref(),
            "apk",
            &["list", "--installed", package],
        )?;
        let first = out.lines().next()?.split_whitespace().next()?;
        extract_version(first.strip_prefix(package).unwrap_or(first))
    }

    fn manual_command(&self, package: &str) -> String {
        format!("sudo apk add {}", package)
    }

    fn attaches_terminal(&self) -> bool {
        self.use_sudo
    }
}
