//! Installer backends.
//!
//! Every package manager is wrapped behind the [`Backend`] trait so the
//! planner and executor never spawn processes themselves. Adding a backend
//! means adding a [`BackendKind`] variant; exhaustive matches point at every
//! place that must learn about it.
//!
//! # Modules
//!
//! - [`homebrew`] - Homebrew on macOS and Linux
//! - [`native`] - apt, dnf, yum and zypper
//! - [`pacman`] - Arch Linux
//! - [`apk`] - Alpine Linux
//! - [`winget`] - Windows Package Manager
//! - [`npm`] - global npm packages
//! - [`script`] - self-installing tools (curl | bash style installers)
//! - [`fake`] - scripted in-memory backend for tests

pub mod apk;
pub mod fake;
pub mod homebrew;
pub mod native;
pub mod npm;
pub mod pacman;
pub mod script;
pub mod winget;

pub use apk::ApkBackend;
pub use fake::{FakeBackend, FakeSystem};
pub use homebrew::HomebrewBackend;
pub use native::{NativeBackend, NativeManager};
pub use npm::NpmBackend;
pub use pacman::PacmanBackend;
pub use script::ScriptBackend;
pub use winget::WingetBackend;

use crate::error::{EnvbootError, Result};
use crate::probe::{LinuxDistro, OsFamily, Platform};
use crate::requirements::Requirement;
use crate::shell::{display_command, CommandOptions, CommandRunner};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// Backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[serde(alias = "brew")]
    Homebrew,
    #[serde(alias = "apt-get")]
    Apt,
    Dnf,
    Yum,
    Zypper,
    Pacman,
    Apk,
    Winget,
    Npm,
    Script,
}

impl BackendKind {
    /// Every backend kind, in a stable order.
    pub const ALL: [BackendKind; 10] = [
        Self::Homebrew,
        Self::Apt,
        Self::Dnf,
        Self::Yum,
        Self::Zypper,
        Self::Pacman,
        Self::Apk,
        Self::Winget,
        Self::Npm,
        Self::Script,
    ];

    /// Whether this is an OS-level package manager (as opposed to npm or a
    /// script, which ride on top of something else).
    pub fn is_system(&self) -> bool {
        !matches!(self, Self::Npm | Self::Script)
    }

    /// Lowercase name used in config files and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Homebrew => "homebrew",
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Zypper => "zypper",
            Self::Pacman => "pacman",
            Self::Apk => "apk",
            Self::Winget => "winget",
            Self::Npm => "npm",
            Self::Script => "script",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform interface over an installer.
///
/// Implementations must not share mutable state: one backend failing can
/// never affect another.
pub trait Backend {
    /// Which family this backend belongs to.
    fn kind(&self) -> BackendKind;

    /// Whether the installer itself is present on this machine.
    fn is_available(&self) -> bool;

    /// Install the requirement's package.
    fn install(&self, requirement: &Requirement) -> Result<()>;

    /// Upgrade the requirement's package to the newest version available.
    fn upgrade(&self, requirement: &Requirement) -> Result<()>;

    /// Remove the requirement's package.
    fn uninstall(&self, requirement: &Requirement) -> Result<()>;

    /// Version of `package` as recorded by the installer.
    fn current_version(&self, package: &str) -> Option<String>;

    /// Command a user can run by hand to install `package`.
    fn manual_command(&self, package: &str) -> String;

    /// Directory where this backend places executables, if it has one that
    /// may be missing from PATH.
    fn bin_dir(&self) -> Option<PathBuf> {
        None
    }

    /// Every directory that may hold executables this backend installed.
    fn bin_dirs(&self) -> Vec<PathBuf> {
        self.bin_dir().into_iter().collect()
    }

    /// Whether installs may prompt on the terminal (sudo passwords,
    /// installer questions). The executor hides its spinner while such a
    /// backend runs.
    fn attaches_terminal(&self) -> bool {
        false
    }
}

/// Backends to consider on a platform, in preference order.
pub fn candidates(platform: &Platform) -> Vec<BackendKind> {
    use BackendKind::*;

    let mut kinds = match platform.os {
        OsFamily::MacOs => vec![Homebrew],
        OsFamily::Linux(distro) => {
            let mut native = match distro {
                LinuxDistro::Debian => vec![Apt],
                LinuxDistro::Fedora => vec![Dnf],
                LinuxDistro::Rhel => vec![Dnf, Yum],
                LinuxDistro::Arch => vec![Pacman],
                LinuxDistro::Alpine => vec![Apk],
                LinuxDistro::Suse => vec![Zypper],
                LinuxDistro::Other => vec![Apt, Dnf, Yum, Pacman, Apk, Zypper],
            };
            native.push(Homebrew);
            native
        }
        OsFamily::Windows => vec![Winget],
        OsFamily::Unknown => return Vec::new(),
    };

    if platform.os != OsFamily::Windows {
        kinds.push(Script);
    }
    kinds.push(Npm);
    kinds
}

/// The package a requirement declares for a backend.
pub(crate) fn package_of(kind: BackendKind, requirement: &Requirement) -> Result<&str> {
    requirement
        .package_for(kind)
        .ok_or_else(|| EnvbootError::ConfigValidationError {
            message: format!(
                "requirement '{}' declares no package for {}",
                requirement.name, kind
            ),
        })
}

/// Run one installer command, mapping a non-zero exit to
/// [`EnvbootError::BackendFailed`] with the captured diagnostic text.
pub(crate) fn run_installer(
    runner: &dyn CommandRunner,
    kind: BackendKind,
    requirement: &str,
    program: &str,
    args: &[&str],
) -> Result<()> {
    run_installer_with(runner, kind, requirement, program, args, &CommandOptions::captured())
}

/// [`run_installer`] with explicit stream wiring.
pub(crate) fn run_installer_with(
    runner: &dyn CommandRunner,
    kind: BackendKind,
    requirement: &str,
    program: &str,
    args: &[&str],
    options: &CommandOptions,
) -> Result<()> {
    let line = display_command(program, args);
    tracing::info!("{}: {}", kind, line);

    let result = runner
        .run_with(program, args, options)
        .map_err(|e| EnvbootError::BackendFailed {
            backend: kind.to_string(),
            requirement: requirement.to_string(),
            message: e.to_string(),
        })?;

    if result.success {
        return Ok(());
    }

    let diagnostic = result.diagnostic();
    let code = result
        .exit_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    Err(EnvbootError::BackendFailed {
        backend: kind.to_string(),
        requirement: requirement.to_string(),
        message: if diagnostic.is_empty() {
            format!("`{}` exited with {}", line, code)
        } else {
            format!("`{}` exited with {}: {}", line, code, diagnostic)
        },
    })
}

/// [`run_installer`], prefixed with `sudo` when requested. Under sudo the
/// installer's stdout goes straight to the terminal alongside the password
/// prompt.
pub(crate) fn run_privileged(
    runner: &dyn CommandRunner,
    kind: BackendKind,
    use_sudo: bool,
    requirement: &str,
    program: &str,
    args: &[&str],
) -> Result<()> {
    if !use_sudo {
        return run_installer(runner, kind, requirement, program, args);
    }
    let mut full = Vec::with_capacity(args.len() + 1);
    full.push(program);
    full.extend_from_slice(args);
    run_installer_with(
        runner,
        kind,
        requirement,
        "sudo",
        &full,
        &CommandOptions::attached(),
    )
}

/// Whether `program <flag>` runs successfully.
pub(crate) fn responds(runner: &dyn CommandRunner, program: &str, flag: &str) -> bool {
    runner
        .run(program, &[flag])
        .map(|r| r.success)
        .unwrap_or(false)
}

/// Run a query command and return its trimmed stdout on success.
pub(crate) fn query(runner: &dyn CommandRunner, program: &str, args: &[&str]) -> Option<String> {
    match runner.run(program, args) {
        Ok(result) if result.success => {
            let out = result.stdout.trim().to_string();
            (!out.is_empty()).then_some(out)
        }
        _ => None,
    }
}

/// Settings that shape how the real backends are constructed.
#[derive(Debug, Clone, Default)]
pub struct BackendOptions {
    /// Prefix native package manager commands with `sudo`.
    pub use_sudo: bool,
    /// Install global npm packages under this prefix instead of npm's default.
    pub npm_prefix: Option<PathBuf>,
    /// Prefix for global npm packages when npm's default is not writable.
    pub npm_user_prefix: Option<PathBuf>,
    /// A user is at the terminal to answer installer prompts.
    pub interactive: bool,
}

/// The set of backends a run can use, at most one per kind.
#[derive(Default)]
pub struct BackendSet {
    backends: Vec<Box<dyn Backend>>,
}

impl BackendSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every real backend, spawning processes through `runner`.
    pub fn system(runner: Rc<dyn CommandRunner>, options: &BackendOptions) -> Self {
        let mut set = Self::new()
            .with(Box::new(HomebrewBackend::new(runner.clone())))
            .with(Box::new(PacmanBackend::new(runner.clone(), options.use_sudo)))
            .with(Box::new(ApkBackend::new(runner.clone(), options.use_sudo)))
            .with(Box::new(WingetBackend::new(runner.clone())))
            .with(Box::new(
                NpmBackend::new(runner.clone())
                    .with_prefix(options.npm_prefix.clone())
                    .with_user_prefix(options.npm_user_prefix.clone()),
            ))
            .with(Box::new(
                ScriptBackend::new(runner.clone()).interactive(options.interactive),
            ));
        for manager in NativeManager::ALL {
            set = set.with(Box::new(NativeBackend::new(
                manager,
                runner.clone(),
                options.use_sudo,
            )));
        }
        set
    }

    /// Add a backend, replacing any existing backend of the same kind.
    pub fn with(mut self, backend: Box<dyn Backend>) -> Self {
        self.backends.retain(|b| b.kind() != backend.kind());
        self.backends.push(backend);
        self
    }

    /// Look up the backend for a kind.
    pub fn get(&self, kind: BackendKind) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .find(|b| b.kind() == kind)
            .map(|b| b.as_ref())
    }

    /// Whether any of `kinds` has an available backend.
    pub fn any_available(&self, kinds: &[BackendKind]) -> bool {
        kinds
            .iter()
            .filter_map(|k| self.get(*k))
            .any(|b| b.is_available())
    }
}
