//! Configuration file discovery and loading.
//!
//! Files are found in this order, later overriding earlier:
//! 1. User global config (`~/.envboot/config.yml`)
//! 2. Project config (`.envboot/config.yml`)
//! 3. Local overrides (`.envboot/config.local.yml`)
//!
//! None of them is required; with no files at all the built-in
//! requirements are used.

use crate::config::merger::merge_configs;
use crate::config::schema::EnvbootConfig;
use crate::config::validator::validate;
use crate::error::{EnvbootError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".envboot";

/// Paths to configuration files in priority order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config: ~/.envboot/config.yml
    pub user_global: Option<PathBuf>,

    /// Project config: .envboot/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .envboot/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self::discover_with_home(project_root, dirs::home_dir().as_deref())
    }

    /// Discover config files with an explicit home directory.
    pub fn discover_with_home(project_root: &Path, home: Option<&Path>) -> Self {
        Self {
            user_global: home.and_then(|h| existing(h.join(CONFIG_DIR).join("config.yml"))),
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Find the project root by walking up from `start`.
///
/// A directory containing `.envboot` wins; a `.git` directory is the
/// fallback.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }
        if current.join(".git").exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load a config file as a raw YAML value, for merging.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvbootError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnvbootError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| EnvbootError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse and validate a merged value. `source` is used for error messages.
fn finish(value: serde_yaml::Value, source: &Path) -> Result<EnvbootConfig> {
    let config = if value.is_null() {
        EnvbootConfig::default()
    } else {
        serde_yaml::from_value(value).map_err(|e| EnvbootError::ConfigParseError {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?
    };
    validate(&config)?;
    Ok(config)
}

/// Load a single config file without merging.
pub fn load_config_file(path: &Path) -> Result<EnvbootConfig> {
    let value = load_config_value(path)?;
    finish(value, path)
}

/// Load and merge every discovered config file.
pub fn load_merged_config(paths: &ConfigPaths) -> Result<EnvbootConfig> {
    let existing = paths.all_existing();
    let Some(last) = existing.last() else {
        tracing::debug!("No configuration files found; using built-in requirements");
        return Ok(EnvbootConfig::default());
    };
    let source = last.to_path_buf();

    let mut values = Vec::with_capacity(existing.len());
    for path in &existing {
        tracing::debug!("Loading config {}", path.display());
        values.push(load_config_value(path)?);
    }

    finish(merge_configs(&values), &source)
}

/// Load config with an optional explicit file.
///
/// An explicit file is loaded alone and must exist. Otherwise the files of
/// the project containing `cwd` are discovered and merged.
pub fn load_config(cwd: &Path, config_override: Option<&Path>) -> Result<EnvbootConfig> {
    if let Some(path) = config_override {
        return load_config_file(path);
    }
    let root = find_project_root(cwd).unwrap_or_else(|| cwd.to_path_buf());
    load_merged_config(&ConfigPaths::discover(&root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputMode;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn discover_finds_project_and_local() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "config.yml", "");
        write(temp.path(), "config.local.yml", "");

        let paths = ConfigPaths::discover_with_home(temp.path(), None);
        assert!(paths.project.is_some());
        assert!(paths.project_local.is_some());
        assert!(paths.user_global.is_none());
    }

    #[test]
    fn all_existing_is_in_merge_order() {
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let global = write(home.path(), "config.yml", "");
        let local = write(project.path(), "config.local.yml", "");

        let paths = ConfigPaths::discover_with_home(project.path(), Some(home.path()));
        assert_eq!(paths.all_existing(), vec![&global, &local]);
    }

    #[test]
    fn find_project_root_prefers_envboot_over_git() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nested").join("project");
        fs::create_dir_all(nested.join(CONFIG_DIR)).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();

        assert_eq!(find_project_root(&nested), Some(nested.clone()));
        assert_eq!(
            find_project_root(&temp.path().join("nested")),
            Some(temp.path().to_path_buf())
        );
    }

    #[test]
    fn no_files_gives_defaults() {
        let config = load_merged_config(&ConfigPaths::default()).unwrap();
        assert!(config.requirements.is_none());
        assert_eq!(config.effective_requirements().len(), 3);
    }

    #[test]
    fn local_overrides_project_settings() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "config.yml",
            "settings:\n  output: verbose\n  check_network: false\nrequirements:\n  - name: rg\n    backends:\n      - { kind: apt, package: ripgrep }\n",
        );
        write(temp.path(), "config.local.yml", "settings:\n  output: quiet\n");

        let paths = ConfigPaths::discover_with_home(temp.path(), None);
        let config = load_merged_config(&paths).unwrap();

        assert_eq!(config.settings.output, Some(OutputMode::Quiet));
        assert!(!config.settings.check_network());
        assert_eq!(config.effective_requirements()[0].name, "rg");
    }

    #[test]
    fn empty_file_is_valid() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "config.yml", "");
        let config = load_config_file(&path).unwrap();
        assert!(config.requirements.is_none());
    }

    #[test]
    fn missing_explicit_file_is_not_found() {
        let result = load_config(Path::new("/"), Some(Path::new("/nonexistent/envboot.yml")));
        assert!(matches!(result, Err(EnvbootError::ConfigNotFound { .. })));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "config.yml", "requirements: [");
        assert!(matches!(
            load_config_file(&path),
            Err(EnvbootError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn duplicate_requirement_fails_validation() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "config.yml",
            "requirements:\n  - name: node\n  - name: node\n",
        );
        assert!(matches!(
            load_config_file(&path),
            Err(EnvbootError::ConfigValidationError { .. })
        ));
    }
}
