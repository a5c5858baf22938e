//! Configuration schema.
//!
//! ```yaml
//! settings:
//!   output: normal          # verbose | normal | quiet | silent
//!   check_network: true
//!   npm_prefix: ~/.npm-global
//!   path_dirs:
//!     - ~/.local/bin
//!
//! requirements:
//!   - name: node
//!     min_version: 18
//!     provides: npm
//!     backends:
//!       - { kind: homebrew, package: node }
//!       - { kind: apt, package: nodejs }
//!   - name: claude
//!     backends:
//!       - { kind: npm, package: "@anthropic-ai/claude-code" }
//! ```

use crate::requirements::{builtin_requirements, Requirement};
use crate::ui::OutputMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvbootConfig {
    #[serde(default)]
    pub settings: Settings,

    /// Ordered requirements. Absent means the built-in bootstrap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<Requirement>>,
}

impl EnvbootConfig {
    /// The requirements a run should satisfy.
    pub fn effective_requirements(&self) -> Vec<Requirement> {
        self.requirements
            .clone()
            .unwrap_or_else(builtin_requirements)
    }
}

/// Global settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Output verbosity; command-line flags take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputMode>,

    /// Probe connectivity before installing anything. Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_network: Option<bool>,

    /// Directories ensured on PATH at the end of every run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_dirs: Vec<PathBuf>,

    /// Global prefix for npm installs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm_prefix: Option<PathBuf>,
}

impl Settings {
    pub fn check_network(&self) -> bool {
        self.check_network.unwrap_or(true)
    }

    /// `path_dirs` with a leading `~` expanded.
    pub fn resolved_path_dirs(&self) -> Vec<PathBuf> {
        let home = dirs::home_dir();
        self.path_dirs
            .iter()
            .map(|d| expand_home(d, home.as_deref()))
            .collect()
    }

    /// `npm_prefix` with a leading `~` expanded.
    pub fn resolved_npm_prefix(&self) -> Option<PathBuf> {
        let home = dirs::home_dir();
        self.npm_prefix
            .as_ref()
            .map(|p| expand_home(p, home.as_deref()))
    }
}

/// Replace a leading `~` component with `home`.
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;

    #[test]
    fn empty_config_uses_builtins() {
        let config: EnvbootConfig = serde_yaml::from_str("{}").unwrap();
        let names: Vec<String> = config
            .effective_requirements()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["homebrew", "node", "claude"]);
        assert!(config.settings.check_network());
    }

    #[test]
    fn parses_full_config() {
        let yaml = r#"
settings:
  output: quiet
  check_network: false
  npm_prefix: /opt/npm
  path_dirs: [/opt/tools/bin]
requirements:
  - name: node
    min_version: 20
    provides: npm
    backends:
      - { kind: brew, package: node }
      - { kind: apt, package: nodejs }
  - name: rg
    command: rg
    platforms: [linux]
    backends:
      - { kind: pacman, package: ripgrep }
"#;
        let config: EnvbootConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.settings.output, Some(OutputMode::Quiet));
        assert!(!config.settings.check_network());
        assert_eq!(config.settings.npm_prefix, Some(PathBuf::from("/opt/npm")));
        let reqs = config.effective_requirements();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].min_version, Some(20));
        assert_eq!(reqs[0].provides, Some(BackendKind::Npm));
        assert_eq!(reqs[0].backends[0].kind, BackendKind::Homebrew);
        assert_eq!(reqs[1].package_for(BackendKind::Pacman), Some("ripgrep"));
    }

    #[test]
    fn unknown_backend_kind_is_rejected() {
        let yaml = r#"
requirements:
  - name: node
    backends:
      - { kind: chocolatey, package: nodejs }
"#;
        assert!(serde_yaml::from_str::<EnvbootConfig>(yaml).is_err());
    }

    #[test]
    fn expand_home_only_touches_leading_tilde() {
        let home = Path::new("/home/dev");
        assert_eq!(
            expand_home(Path::new("~/.npm-global"), Some(home)),
            PathBuf::from("/home/dev/.npm-global")
        );
        assert_eq!(
            expand_home(Path::new("/opt/~x"), Some(home)),
            PathBuf::from("/opt/~x")
        );
        assert_eq!(expand_home(Path::new("~/bin"), None), PathBuf::from("~/bin"));
    }

    #[test]
    fn unknown_setting_is_rejected() {
        assert!(serde_yaml::from_str::<EnvbootConfig>("settings:\n  parallel: true").is_err());
    }
}
