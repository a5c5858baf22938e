//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use envboot::config::{load_merged_config, ConfigPaths};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".envboot");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "settings:\n  output: quiet\n").unwrap();
//!
//! let paths = ConfigPaths::discover_with_home(temp.path(), None);
//! let config = load_merged_config(&paths).unwrap();
//! assert_eq!(config.effective_requirements().len(), 3);
//! ```

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    ConfigPaths,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{expand_home, EnvbootConfig, Settings};
pub use validator::validate;
