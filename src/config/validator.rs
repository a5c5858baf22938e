//! Configuration validation rules.
//!
//! Requirement lists must have unique names, a package for every backend,
//! and providers declared before their consumers. Settings paths must not
//! be empty.

use crate::config::schema::EnvbootConfig;
use crate::error::{EnvbootError, Result};
use crate::requirements::validate_requirements;

/// Validate a configuration, stopping at the first problem.
pub fn validate(config: &EnvbootConfig) -> Result<()> {
    if let Some(requirements) = &config.requirements {
        validate_requirements(requirements)?;
    }

    if config
        .settings
        .path_dirs
        .iter()
        .any(|d| d.as_os_str().is_empty())
    {
        return Err(EnvbootError::ConfigValidationError {
            message: "settings.path_dirs contains an empty path".to_string(),
        });
    }

    if let Some(prefix) = &config.settings.npm_prefix {
        if prefix.as_os_str().is_empty() {
            return Err(EnvbootError::ConfigValidationError {
                message: "settings.npm_prefix is empty".to_string(),
            });
        }
    }

    Ok(())
}
