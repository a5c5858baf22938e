//! Operating system, architecture and shell detection.
//!
//! Detection is total: anything unrecognized becomes an explicit `Unknown`
//! variant so callers always have something to match on.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Linux distribution family, as far as package management is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinuxDistro {
    /// Debian, Ubuntu, Mint, Pop!_OS (apt).
    Debian,
    /// Fedora (dnf).
    Fedora,
    /// RHEL, CentOS, Rocky, Alma, Amazon Linux (dnf or yum).
    Rhel,
    /// Arch, Manjaro, EndeavourOS (pacman).
    Arch,
    /// Alpine (apk).
    Alpine,
    /// openSUSE, SLES (zypper).
    Suse,
    /// Anything else; every native manager is tried.
    Other,
}

impl LinuxDistro {
    /// Classify a distro from the `ID` and `ID_LIKE` fields of os-release.
    pub fn from_os_release(content: &str) -> Self {
        let mut ids = Vec::new();
        for key in ["ID", "ID_LIKE"] {
            if let Some(value) = os_release_field(content, key) {
                ids.extend(value.split_whitespace().map(str::to_lowercase));
            }
        }

        for id in &ids {
            let distro = match id.as_str() {
                "debian" | "ubuntu" | "linuxmint" | "pop" | "raspbian" => Self::Debian,
                "fedora" => Self::Fedora,
                "rhel" | "centos" | "rocky" | "almalinux" | "amzn" | "ol" => Self::Rhel,
                "arch" | "manjaro" | "endeavouros" => Self::Arch,
                "alpine" => Self::Alpine,
                "opensuse" | "opensuse-leap" | "opensuse-tumbleweed" | "suse" | "sles" => {
                    Self::Suse
                }
                _ => continue,
            };
            return distro;
        }
        Self::Other
    }
}

fn os_release_field<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        if k.trim() == key {
            Some(v.trim().trim_matches('"').trim_matches('\''))
        } else {
            None
        }
    })
}

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "family", content = "distro")]
pub enum OsFamily {
    MacOs,
    Linux(LinuxDistro),
    Windows,
    Unknown,
}

/// OS family without distro detail, used for requirement platform filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsKind {
    Macos,
    Linux,
    Windows,
}

impl OsFamily {
    /// The distro-less kind, or `None` for unknown systems.
    pub fn kind(&self) -> Option<OsKind> {
        match self {
            Self::MacOs => Some(OsKind::Macos),
            Self::Linux(_) => Some(OsKind::Linux),
            Self::Windows => Some(OsKind::Windows),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "macOS"),
            Self::Linux(distro) => write!(f, "Linux ({:?})", distro),
            Self::Windows => write!(f, "Windows"),
            Self::Unknown => write!(f, "unknown OS"),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    X64,
    Arm64,
    X86,
    Arm,
    Unknown,
}

impl Arch {
    /// Parse from `std::env::consts::ARCH` or `uname -m` style names.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Self::X64,
            "aarch64" | "arm64" => Self::Arm64,
            "x86" | "i386" | "i686" => Self::X86,
            "arm" | "armv7" | "armv7l" | "armv6l" => Self::Arm,
            _ => Self::Unknown,
        }
    }
}

/// Interactive shell kind, which decides the config file to persist PATH in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellKind {
    Zsh,
    Bash,
    Fish,
    PowerShell,
    Sh,
    Unknown,
}

impl ShellKind {
    /// Parse shell kind from an executable path or name.
    pub fn from_executable(exe: &str) -> Self {
        let name = Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "zsh" => Self::Zsh,
            "bash" => Self::Bash,
            "fish" => Self::Fish,
            "powershell" | "pwsh" => Self::PowerShell,
            "sh" | "dash" | "ash" | "ksh" => Self::Sh,
            _ => Self::Unknown,
        }
    }
}

/// The machine envboot is running on. Computed once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub os: OsFamily,
    pub arch: Arch,
    pub shell: ShellKind,
}

impl Platform {
    /// Build a platform directly (tests and fixed-target tooling).
    pub fn new(os: OsFamily, arch: Arch, shell: ShellKind) -> Self {
        Self { os, arch, shell }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}, shell {:?}", self.os, self.arch, self.shell)
    }
}

/// Detect the live platform.
pub fn detect_platform() -> Platform {
    let os_release = std::fs::read_to_string("/etc/os-release").ok();
    detect_platform_with(
        std::env::consts::OS,
        std::env::consts::ARCH,
        |key: &str| std::env::var(key),
        os_release.as_deref(),
    )
}

/// Detect the platform from explicit inputs.
///
/// This allows testing every branch without touching the real machine.
pub fn detect_platform_with<F>(
    os: &str,
    arch: &str,
    env_fn: F,
    os_release: Option<&str>,
) -> Platform
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let os = match os {
        "macos" => OsFamily::MacOs,
        "linux" => OsFamily::Linux(
            os_release
                .map(LinuxDistro::from_os_release)
                .unwrap_or(LinuxDistro::Other),
        ),
        "windows" => OsFamily::Windows,
        _ => OsFamily::Unknown,
    };

    let shell = detect_shell(os, &env_fn);
    let platform = Platform {
        os,
        arch: Arch::from_name(arch),
        shell,
    };
    tracing::debug!("Detected platform: {}", platform);
    platform
}

fn detect_shell<F>(os: OsFamily, env_fn: &F) -> ShellKind
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    if let Ok(shell) = env_fn("SHELL") {
        let kind = ShellKind::from_executable(&shell);
        if kind != ShellKind::Unknown {
            return kind;
        }
    }

    if os == OsFamily::Windows {
        // PowerShell sets PSModulePath for its child processes; cmd does not.
        if env_fn("PSModulePath").is_ok() {
            return ShellKind::PowerShell;
        }
        if let Ok(comspec) = env_fn("COMSPEC") {
            return ShellKind::from_executable(&comspec);
        }
    }

    ShellKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::VarError;

    fn env_with(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Result<String, VarError> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn detects_macos_arm_zsh() {
        let platform = detect_platform_with(
            "macos",
            "aarch64",
            env_with(&[("SHELL", "/bin/zsh")]),
            None,
        );
        assert_eq!(platform.os, OsFamily::MacOs);
        assert_eq!(platform.arch, Arch::Arm64);
        assert_eq!(platform.shell, ShellKind::Zsh);
    }

    #[test]
    fn detects_ubuntu_from_os_release() {
        let os_release = "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\n";
        let platform = detect_platform_with(
            "linux",
            "x86_64",
            env_with(&[("SHELL", "/usr/bin/bash")]),
            Some(os_release),
        );
        assert_eq!(platform.os, OsFamily::Linux(LinuxDistro::Debian));
        assert_eq!(platform.arch, Arch::X64);
        assert_eq!(platform.shell, ShellKind::Bash);
    }

    #[test]
    fn id_like_is_consulted_when_id_is_unknown() {
        let os_release = "ID=\"rocky\"\n";
        assert_eq!(LinuxDistro::from_os_release(os_release), LinuxDistro::Rhel);

        let os_release = "ID=neon\nID_LIKE=\"ubuntu debian\"\n";
        assert_eq!(LinuxDistro::from_os_release(os_release), LinuxDistro::Debian);
    }

    #[test]
    fn linux_without_os_release_is_other() {
        let platform = detect_platform_with("linux", "x86_64", env_with(&[]), None);
        assert_eq!(platform.os, OsFamily::Linux(LinuxDistro::Other));
    }

    #[test]
    fn windows_powershell_detected_from_psmodulepath() {
        let platform = detect_platform_with(
            "windows",
            "x86_64",
            env_with(&[
                ("PSModulePath", "C:\\Program Files\\PowerShell\\Modules"),
                ("COMSPEC", "C:\\Windows\\system32\\cmd.exe"),
            ]),
            None,
        );
        assert_eq!(platform.os, OsFamily::Windows);
        assert_eq!(platform.shell, ShellKind::PowerShell);
    }

    #[test]
    fn unrecognized_inputs_map_to_unknown() {
        let platform = detect_platform_with(
            "haiku",
            "riscv64",
            env_with(&[("SHELL", "/usr/bin/elvish")]),
            None,
        );
        assert_eq!(platform.os, OsFamily::Unknown);
        assert_eq!(platform.arch, Arch::Unknown);
        assert_eq!(platform.shell, ShellKind::Unknown);
        assert_eq!(platform.os.kind(), None);
    }

    #[test]
    fn every_os_family_is_total() {
        for os in ["macos", "linux", "windows", "freebsd", ""] {
            for arch in ["x86_64", "aarch64", "x86", "arm", "mips"] {
                let platform = detect_platform_with(os, arch, env_with(&[]), Some("garbage"));
                let _ = platform.to_string();
            }
        }
    }

    #[test]
    fn shell_kind_from_executable() {
        assert_eq!(ShellKind::from_executable("/bin/bash"), ShellKind::Bash);
        assert_eq!(ShellKind::from_executable("/usr/bin/fish"), ShellKind::Fish);
        assert_eq!(ShellKind::from_executable("pwsh"), ShellKind::PowerShell);
        assert_eq!(ShellKind::from_executable("/bin/dash"), ShellKind::Sh);
        assert_eq!(ShellKind::from_executable("cmd.exe"), ShellKind::Unknown);
    }

    #[test]
    fn arch_from_name_aliases() {
        assert_eq!(Arch::from_name("amd64"), Arch::X64);
        assert_eq!(Arch::from_name("arm64"), Arch::Arm64);
        assert_eq!(Arch::from_name("i686"), Arch::X86);
        assert_eq!(Arch::from_name("armv7l"), Arch::Arm);
    }

    #[test]
    fn detect_platform_on_live_machine_does_not_panic() {
        let platform = detect_platform();
        assert!(!platform.to_string().is_empty());
    }
}
