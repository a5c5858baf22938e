//! Requirement definitions.
//!
//! A requirement names a tool, the binary that proves it is installed, an
//! optional minimum major version, and the backends able to install it.
//! Built-in requirements cover the default bootstrap; project and user
//! configuration can replace them.

use crate::backend::BackendKind;
use crate::error::{EnvbootError, Result};
use crate::probe::{OsKind, Platform};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One way to install a requirement: a backend and its package identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSpec {
    /// Backend family.
    pub kind: BackendKind,
    /// Package name, winget id, npm package or install script.
    pub package: String,
}

impl BackendSpec {
    /// Create a backend spec.
    pub fn new(kind: BackendKind, package: impl Into<String>) -> Self {
        Self {
            kind,
            package: package.into(),
        }
    }
}

/// A desired tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Requirement name (e.g., "node", "claude").
    pub name: String,

    /// Binary probed to decide whether the tool is installed.
    /// Defaults to the requirement name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Minimum major version; `None` accepts any installed version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<u32>,

    /// Backends able to install this tool, in preference order.
    #[serde(default)]
    pub backends: Vec<BackendSpec>,

    /// Restrict the requirement to these operating systems.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<OsKind>>,

    /// Backend that becomes usable once this tool is installed
    /// (node provides npm, homebrew provides homebrew).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<BackendKind>,

    /// Manual install instructions shown when installation fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_hint: Option<String>,
}

impl Requirement {
    /// Create a requirement with no backends.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: None,
            min_version: None,
            backends: Vec::new(),
            platforms: None,
            provides: None,
            manual_hint: None,
        }
    }

    /// Set the probed binary.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set the minimum major version.
    pub fn with_min_version(mut self, major: u32) -> Self {
        self.min_version = Some(major);
        self
    }

    /// Append a backend option.
    pub fn with_backend(mut self, kind: BackendKind, package: impl Into<String>) -> Self {
        self.backends.push(BackendSpec::new(kind, package));
        self
    }

    /// Restrict to the given operating systems.
    pub fn only_on(mut self, platforms: Vec<OsKind>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    /// Declare the backend this tool provides.
    pub fn providing(mut self, kind: BackendKind) -> Self {
        self.provides = Some(kind);
        self
    }

    /// Set manual install instructions.
    pub fn with_manual_hint(mut self, hint: impl Into<String>) -> Self {
        self.manual_hint = Some(hint.into());
        self
    }

    /// The binary probed for this requirement.
    pub fn command(&self) -> &str {
        self.command.as_deref().unwrap_or(&self.name)
    }

    /// Package identifier for a backend, if declared.
    pub fn package_for(&self, kind: BackendKind) -> Option<&str> {
        self.backends
            .iter()
            .find(|b| b.kind == kind)
            .map(|b| b.package.as_str())
    }

    /// Whether the platform filter admits this platform.
    pub fn supports_os(&self, platform: &Platform) -> bool {
        match (&self.platforms, platform.os.kind()) {
            (None, _) => true,
            (Some(allowed), Some(kind)) => allowed.contains(&kind),
            (Some(_), None) => false,
        }
    }
}

/// The built-in bootstrap: Homebrew on macOS, Node.js 18+, and the Claude
/// Code CLI installed globally through npm.
pub fn builtin_requirements() -> Vec<Requirement> {
    vec![
        Requirement::new("homebrew")
            .with_command("brew")
            .only_on(vec![OsKind::Macos])
            .with_backend(
                BackendKind::Script,
                "/bin/bash -c \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\"",
            )
            .providing(BackendKind::Homebrew)
            .with_manual_hint("See https://brew.sh for installation instructions"),
        Requirement::new("node")
            .with_min_version(18)
            .with_backend(BackendKind::Homebrew, "node")
            .with_backend(BackendKind::Apt, "nodejs")
            .with_backend(BackendKind::Dnf, "nodejs")
            .with_backend(BackendKind::Yum, "nodejs")
            .with_backend(BackendKind::Zypper, "nodejs")
            .with_backend(BackendKind::Pacman, "nodejs")
            .with_backend(BackendKind::Apk, "nodejs")
            .with_backend(BackendKind::Winget, "OpenJS.NodeJS.LTS")
            .providing(BackendKind::Npm)
            .with_manual_hint("Download Node.js 18 or newer from https://nodejs.org"),
        Requirement::new("claude")
            .with_backend(BackendKind::Npm, "@anthropic-ai/claude-code")
            .with_manual_hint("npm install -g @anthropic-ai/claude-code"),
    ]
}

/// Validate an ordered requirement list.
///
/// Names must be unique, every backend must name a package, and a
/// requirement that provides a backend must be declared before any
/// requirement installed through that backend.
pub fn validate_requirements(requirements: &[Requirement]) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, req) in requirements.iter().enumerate() {
        if req.name.trim().is_empty() {
            return Err(EnvbootError::ConfigValidationError {
                message: format!("requirement #{} has an empty name", index + 1),
            });
        }
        if !seen.insert(req.name.as_str()) {
            return Err(EnvbootError::ConfigValidationError {
                message: format!("requirement '{}' is declared twice", req.name),
            });
        }
        if let Some(spec) = req.backends.iter().find(|b| b.package.trim().is_empty()) {
            return Err(EnvbootError::ConfigValidationError {
                message: format!(
                    "requirement '{}' has an empty package for backend {}",
                    req.name, spec.kind
                ),
            });
        }
    }

    for (index, req) in requirements.iter().enumerate() {
        let Some(provided) = req.provides else {
            continue;
        };
        if let Some(earlier) = requirements[..index]
            .iter()
            .find(|r| r.backends.iter().any(|b| b.kind == provided))
        {
            return Err(EnvbootError::ConfigValidationError {
                message: format!(
                    "'{}' installs through {} but is declared before '{}', which provides it",
                    earlier.name, provided, req.name
                ),
            });
        }
    }

    Ok(())
}

/// Find a requirement by name.
pub fn find_requirement<'a>(requirements: &'a [Requirement], name: &str) -> Result<&'a Requirement> {
    requirements
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| EnvbootError::UnknownRequirement {
            name: name.to_string(),
        })
}
