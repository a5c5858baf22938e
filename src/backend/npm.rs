//! Global npm packages.
//!
//! This backend only exists once Node.js is installed, which is why the
//! planner treats a pending Node.js install as making npm available.

use super::{package_of, query, responds, run_installer, Backend, BackendKind};
use crate::error::Result;
use crate::requirements::Requirement;
use crate::shell::{is_writable, CommandRunner};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// npm ships as a batch file on Windows, which `CreateProcess` only finds
/// by its full name.
const NPM: &str = if cfg!(windows) { "npm.cmd" } else { "npm" };

pub struct NpmBackend {
    runner: Rc<dyn CommandRunner>,
    prefix: Option<PathBuf>,
    user_prefix: Option<PathBuf>,
}

impl NpmBackend {
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            prefix: None,
            user_prefix: None,
        }
    }

    /// Always install under `prefix` instead of npm's global default.
    pub fn with_prefix(mut self, prefix: Option<PathBuf>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Install under `prefix` when npm's global prefix is not writable, as
    /// with a distribution Node.js that owns `/usr`.
    pub fn with_user_prefix(mut self, prefix: Option<PathBuf>) -> Self {
        self.user_prefix = prefix;
        self
    }

    /// Prefix to pass as `--prefix`, if any.
    fn install_prefix(&self) -> Option<PathBuf> {
        if self.prefix.is_some() {
            return self.prefix.clone();
        }
        let user_prefix = self.user_prefix.as_ref()?;
        match self.global_prefix() {
            Some(global) if is_writable(&global) => None,
            global => {
                tracing::debug!(
                    "npm global prefix {:?} is not writable, using {}",
                    global,
                    user_prefix.display()
                );
                Some(user_prefix.clone())
            }
        }
    }

    fn global_prefix(&self) -> Option<PathBuf> {
        query(self.runner.as_ref(), NPM, &["prefix", "-g"]).map(PathBuf::from)
    }

    fn npm(&self, requirement: &Requirement, args: &[&str]) -> Result<()> {
        let prefix = self.install_prefix();
        let mut full = args.to_vec();
        let prefix_arg = prefix.as_deref().map(Path::to_string_lossy);
        if let Some(prefix) = prefix_arg.as_deref() {
            full.extend_from_slice(&["--prefix", prefix]);
        }
        run_installer(
            self.runner.as_ref(),
            BackendKind::Npm,
            &requirement.name,
            NPM,
            &full,
        )
    }
}

impl Backend for NpmBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Npm
    }

    fn is_available(&self) -> bool {
        responds(self.runner.as_ref(), NPM, "--version")
    }

    fn install(&self, requirement: &Requirement) -> Result<()> {
        let package = package_of(BackendKind::Npm, requirement)?;
        self.npm(requirement, &["install", "-g", package])
    }

    fn upgrade(&self, requirement: &Requirement) -> Result<()> {
        let package = package_of(BackendKind::Npm, requirement)?;
        let latest = format!("{}@latest", package);
        self.npm(requirement, &["install", "-g", &latest])
    }

    fn uninstall(&self, requirement: &Requirement) -> Result<()> {
        let package = package_of(BackendKind::Npm, requirement)?;
        self.npm(requirement, &["uninstall", "-g", package])
    }

    fn current_version(&self, package: &str) -> Option<String> {
        let prefix = self.install_prefix();
        let prefix_arg = prefix.as_deref().map(Path::to_string_lossy);
        let mut args = vec!["ls", "-g", package, "--depth=0", "--json"];
        if let Some(prefix) = prefix_arg.as_deref() {
            args.extend_from_slice(&["--prefix", prefix]);
        }
        let out = query(self.runner.as_ref(), NPM, &args)?;
        let json: serde_json::Value = serde_json::from_str(&out).ok()?;
        json.get("dependencies")?
            .get(package)?
            .get("version")?
            .as_str()
            .map(str::to_string)
    }

    fn manual_command(&self, package: &str) -> String {
        format!("npm install -g {}", package)
    }

    fn bin_dir(&self) -> Option<PathBuf> {
        let prefix = match self.install_prefix() {
            Some(prefix) => prefix,
            None => self.global_prefix()?,
        };
        // Windows puts global shims directly in the prefix.
        if cfg!(windows) {
            Some(prefix)
        } else {
            Some(prefix.join("bin"))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::shell::ScriptedRunner;

    fn claude() -> Requirement {
        Requirement::new("claude").with_backend(BackendKind::Npm, "@anthropic-ai/claude-code")
    }

    #[test]
    fn installs_globally() {
        let runner = Rc::new(
            ScriptedRunner::new().with_success("npm install -g @anthropic-ai/claude-code", ""),
        );
        NpmBackend::new(runner.clone()).install(&claude()).unwrap();
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn installs_into_user_prefix() {
        let runner = Rc::new(ScriptedRunner::new().with_success(
            "npm install -g @anthropic-ai/claude-code --prefix /home/dev/.npm-global",
            "",
        ));
        let backend =
            NpmBackend::new(runner).with_prefix(Some(PathBuf::from("/home/dev/.npm-global")));

        backend.install(&claude()).unwrap();
        assert_eq!(
            backend.bin_dir(),
            Some(PathBuf::from("/home/dev/.npm-global/bin"))
        );
    }

    #[test]
    fn read_only_global_prefix_falls_back_to_user_prefix() {
        let runner = Rc::new(
            ScriptedRunner::new()
                .with_success("npm prefix -g", "/nonexistent/envboot/usr\n")
                .with_success(
                    "npm install -g @anthropic-ai/claude-code --prefix /home/dev/.npm-global",
                    "",
                ),
        );
        let backend = NpmBackend::new(runner.clone())
            .with_user_prefix(Some(PathBuf::from("/home/dev/.npm-global")));

        backend.install(&claude()).unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "npm prefix -g",
                "npm install -g @anthropic-ai/claude-code --prefix /home/dev/.npm-global"
            ]
        );
        assert_eq!(
            backend.bin_dir(),
            Some(PathBuf::from("/home/dev/.npm-global/bin"))
        );
    }

    #[test]
    fn writable_global_prefix_is_kept() {
        let temp = tempfile::TempDir::new().unwrap();
        let global = temp.path().display().to_string();
        let runner = Rc::new(
            ScriptedRunner::new()
                .with_success("npm prefix -g", &global)
                .with_success("npm install -g @anthropic-ai/claude-code", ""),
        );
        let backend = NpmBackend::new(runner)
            .with_user_prefix(Some(PathBuf::from("/home/dev/.npm-global")));

        backend.install(&claude()).unwrap();
        assert_eq!(backend.bin_dir(), Some(temp.path().join("bin")));
    }

    #[test]
    fn upgrade_targets_latest() {
        let runner = Rc::new(
            ScriptedRunner::new().with_success("npm install -g @anthropic-ai/claude-code@latest", ""),
        );
        NpmBackend::new(runner).upgrade(&claude()).unwrap();
    }

    #[test]
    fn version_from_ls_json() {
        let json = r#"{"dependencies":{"@anthropic-ai/claude-code":{"version":"1.0.35"}}}"#;
        let runner = Rc::new(ScriptedRunner::new().with_success(
            "npm ls -g @anthropic-ai/claude-code --depth=0 --json",
            json,
        ));
        let backend = NpmBackend::new(runner);
        assert_eq!(
            backend.current_version("@anthropic-ai/claude-code").as_deref(),
            Some("1.0.35")
        );
    }

    #[test]
    fn version_lookup_uses_install_prefix() {
        let json = r#"{"dependencies":{"@anthropic-ai/claude-code":{"version":"1.0.35"}}}"#;
        let runner = Rc::new(ScriptedRunner::new().with_success(
            "npm ls -g @anthropic-ai/claude-code --depth=0 --json --prefix /home/dev/.npm-global",
            json,
        ));
        let backend =
            NpmBackend::new(runner).with_prefix(Some(PathBuf::from("/home/dev/.npm-global")));
        assert_eq!(
            backend.current_version("@anthropic-ai/claude-code").as_deref(),
            Some("1.0.35")
        );
    }

    #[test]
    fn bin_dir_from_global_prefix() {
        let runner = Rc::new(ScriptedRunner::new().with_success("npm prefix -g", "/usr/local\n"));
        assert_eq!(
            NpmBackend::new(runner).bin_dir(),
            Some(PathBuf::from("/usr/local/bin"))
        );
    }

    #[test]
    fn unavailable_without_npm() {
        assert!(!NpmBackend::new(Rc::new(ScriptedRunner::new())).is_available());
    }
}
