//! Distribution package managers with the same install/upgrade/remove shape:
//! apt, dnf, yum and zypper.

use super::{package_of, query, responds, run_privileged, Backend, BackendKind};
use crate::error::Result;
use crate::requirements::Requirement;
use crate::shell::{display_command, CommandRunner};
use std::rc::Rc;

/// Which distribution package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeManager {
    Apt,
    Dnf,
    Yum,
    Zypper,
}

impl NativeManager {
    pub const ALL: [NativeManager; 4] = [Self::Apt, Self::Dnf, Self::Yum, Self::Zypper];

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Apt => BackendKind::Apt,
            Self::Dnf => BackendKind::Dnf,
            Self::Yum => BackendKind::Yum,
            Self::Zypper => BackendKind::Zypper,
        }
    }

    fn program(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Zypper => "zypper",
        }
    }

    fn install_args<'a>(&self, package: &'a str) -> Vec<&'a str> {
        match self {
            Self::Apt | Self::Dnf | Self::Yum => vec!["install", "-y", package],
            Self::Zypper => vec!["--non-interactive", "install", package],
        }
    }

    fn upgrade_args<'a>(&self, package: &'a str) -> Vec<&'a str> {
        match self {
            Self::Apt => vec!["install", "--only-upgrade", "-y", package],
            Self::Dnf => vec!["upgrade", "-y", package],
            Self::Yum => vec!["update", "-y", package],
            Self::Zypper => vec!["--non-interactive", "update", package],
        }
    }

    fn remove_args<'a>(&self, package: &'a str) -> Vec<&'a str> {
        match self {
            Self::Apt | Self::Dnf | Self::Yum => vec!["remove", "-y", package],
            Self::Zypper => vec!["--non-interactive", "remove", package],
        }
    }
}

/// Installs distribution packages, escalating with `sudo` when not root.
pub struct NativeBackend {
    manager: NativeManager,
    runner: Rc<dyn CommandRunner>,
    use_sudo: bool,
}

impl NativeBackend {
    pub fn new(manager: NativeManager, runner: Rc<dyn CommandRunner>, use_sudo: bool) -> Self {
        Self {
            manager,
            runner,
            use_sudo,
        }
    }

    fn privileged(&self, requirement: &str, args: &[&str]) -> Result<()> {
        run_privileged(
            self.runner.as_ref(),
            self.manager.kind(),
            self.use_sudo,
            requirement,
            self.manager.program(),
            args,
        )
    }

    /// apt needs fresh package lists; a failed refresh is not fatal since
    /// the cached lists may still carry the package.
    fn refresh_index(&self, requirement: &str) {
        if self.manager != NativeManager::Apt {
            return;
        }
        if let Err(e) = self.privileged(requirement, &["update"]) {
            tracing::warn!("Package index refresh failed, continuing: {}", e);
        }
    }
}

impl Backend for NativeBackend {
    fn kind(&self) -> BackendKind {
        self.manager.kind()
    }

    fn is_available(&self) -> bool {
        responds(self.runner.as_ref(), self.manager.program(), "--version")
    }

    fn install(&self, requirement: &Requirement) -> Result<()> {
        let package = package_of(self.kind(), requirement)?;
        self.refresh_index(&requirement.name);
        self.privileged(&requirement.name, &self.manager.install_args(package))
    }

    fn upgrade(&self, requirement: &Requirement) -> Result<()> {
        let package = package_of(self.kind(), requirement)?;
        self.refresh_index(&requirement.name);
        self.privileged(&requirement.name, &self.manager.upgrade_args(package))
    }

    fn uninstall(&self, requirement: &Requirement) -> Result<()> {
        let package = package_of(self.kind(), requirement)?;
        self.privileged(&requirement.name, &self.manager.remove_args(package))
    }

    fn current_version(&self, package: &str) -> Option<String> {
        match self.manager {
            NativeManager::Apt => query(
                self.runner.as_ref(),
                "dpkg-query",
                &["-W", "-f=${Version}", package],
            ),
            _ => query(
                self.runner.as_ref(),
                "rpm",
                &["-q", "--qf", "%{VERSION}", package],
            ),
        }
    }

    fn manual_command(&self, package: &str) -> String {
        let line = display_command(self.manager.program(), &self.manager.install_args(package));
        format!("sudo {}", line)
    }

    fn attaches_terminal(&self) -> bool {
        self.use_sudo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnvbootError;
    use crate::shell::ScriptedRunner;

    fn node() -> Requirement {
        Requirement::new("node")
            .with_backend(BackendKind::Apt, "nodejs")
            .with_backend(BackendKind::Dnf, "nodejs")
            .with_backend(BackendKind::Zypper, "nodejs")
    }

    #[test]
    fn apt_refreshes_then_installs_with_sudo() {
        let runner = Rc::new(
            ScriptedRunner::new()
                .with_success("sudo apt-get update", "")
                .with_success("sudo apt-get install -y nodejs", ""),
        );
        let backend = NativeBackend::new(NativeManager::Apt, runner.clone(), true);

        backend.install(&node()).unwrap();
        assert_eq!(
            runner.calls(),
            vec!["sudo apt-get update", "sudo apt-get install -y nodejs"]
        );
        assert!(backend.attaches_terminal());
        assert!(runner.options().iter().all(|o| !o.capture_stdout));
    }

    #[test]
    fn apt_refresh_failure_is_not_fatal() {
        let runner = Rc::new(
            ScriptedRunner::new()
                .with_failure("apt-get update", 100, "Temporary failure resolving")
                .with_success("apt-get install -y nodejs", ""),
        );
        let backend = NativeBackend::new(NativeManager::Apt, runner, false);
        backend.install(&node()).unwrap();
    }

    #[test]
    fn dnf_skips_refresh_and_runs_as_root() {
        let runner = Rc::new(ScriptedRunner::new().with_success("dnf install -y nodejs", ""));
        let backend = NativeBackend::new(NativeManager::Dnf, runner.clone(), false);

        backend.install(&node()).unwrap();
        assert_eq!(runner.calls(), vec!["dnf install -y nodejs"]);
        assert!(!backend.attaches_terminal());
    }

    #[test]
    fn zypper_upgrade_is_non_interactive() {
        let runner = Rc::new(
            ScriptedRunner::new().with_success("sudo zypper --non-interactive update nodejs", ""),
        );
        let backend = NativeBackend::new(NativeManager::Zypper, runner, true);
        backend.upgrade(&node()).unwrap();
    }

    #[test]
    fn install_failure_carries_diagnostic() {
        let runner = Rc::new(
            ScriptedRunner::new()
                .with_success("apt-get update", "")
                .with_failure(
                    "apt-get install -y nodejs",
                    100,
                    "E: Unable to locate package nodejs",
                ),
        );
        let backend = NativeBackend::new(NativeManager::Apt, runner, false);

        let err = backend.install(&node()).unwrap_err();
        assert!(matches!(err, EnvbootError::BackendFailed { .. }));
        assert!(err.to_string().contains("Unable to locate package"));
    }

    #[test]
    fn apt_version_from_dpkg() {
        let runner = Rc::new(
            ScriptedRunner::new().with_success("dpkg-query -W -f=${Version} nodejs", "18.19.0+dfsg-6"),
        );
        let backend = NativeBackend::new(NativeManager::Apt, runner, false);
        assert_eq!(
            backend.current_version("nodejs").as_deref(),
            Some("18.19.0+dfsg-6")
        );
    }

    #[test]
    fn manual_command_includes_sudo() {
        let backend = NativeBackend::new(NativeManager::Yum, Rc::new(ScriptedRunner::new()), false);
        assert_eq!(backend.manual_command("nodejs"), "sudo yum install -y nodejs");
    }
}
