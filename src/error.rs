//! Error types for envboot operations.
//!
//! This module defines [`EnvbootError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Probes never return errors; they degrade to "unknown" or "not installed"
//! - Backend failures are surfaced per action and never abort a whole run
//! - Only [`EnvbootError::Preflight`] stops a run before any action executes
//! - Use `anyhow::Error` (via `EnvbootError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for envboot operations.
#[derive(Debug, Error)]
pub enum EnvbootError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A requirement name that is not declared anywhere.
    #[error("Unknown requirement: {name}")]
    UnknownRequirement { name: String },

    /// Shell command could not be spawned or exited non-zero.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A backend ran but reported failure.
    #[error("{backend} failed for '{requirement}': {message}")]
    BackendFailed {
        backend: String,
        requirement: String,
        message: String,
    },

    /// The backend selected for an action is not present on this machine.
    #[error("{backend} is not available on this machine")]
    BackendUnavailable { backend: String },

    /// The operation has no meaning for this backend or platform.
    #[error("{operation} is not supported by {backend}")]
    Unsupported { backend: String, operation: String },

    /// A fatal condition detected before any action ran.
    #[error("Pre-flight check failed: {reason}")]
    Preflight { reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for envboot operations.
pub type Result<T> = std::result::Result<T, EnvbootError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = EnvbootError::ConfigNotFound {
            path: PathBuf::from("/foo/config.yml"),
        };
        assert!(err.to_string().contains("/foo/config.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = EnvbootError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn backend_failed_displays_backend_requirement_and_message() {
        let err = EnvbootError::BackendFailed {
            backend: "apt".into(),
            requirement: "node".into(),
            message: "E: Unable to locate package nodejs".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt"));
        assert!(msg.contains("node"));
        assert!(msg.contains("Unable to locate package"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = EnvbootError::CommandFailed {
            command: "npm install -g foo".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("npm install -g foo"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn preflight_is_reported_distinctly() {
        let err = EnvbootError::Preflight {
            reason: "no network connectivity".into(),
        };
        assert!(err.to_string().starts_with("Pre-flight check failed"));
    }

    #[test]
    fn unsupported_displays_operation() {
        let err = EnvbootError::Unsupported {
            backend: "script".into(),
            operation: "uninstall".into(),
        };
        assert_eq!(err.to_string(), "uninstall is not supported by script");
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: EnvbootError = io_err.into();
        assert!(matches!(err, EnvbootError::Io(_)));
    }
}
