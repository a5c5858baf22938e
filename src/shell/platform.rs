//! Process-level environment facts used by the shell layer.

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`,
/// `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    is_ci_with(|key| std::env::var(key))
}

/// [`is_ci`] with a custom env var lookup (for testing).
pub fn is_ci_with<F>(env_fn: F) -> bool
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    const CI_VARS: &[&str] = &[
        "CI",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "CIRCLECI",
        "TRAVIS",
        "JENKINS_URL",
    ];
    CI_VARS.iter().any(|var| env_fn(var).is_ok())
}

/// Check if running as root/admin.
///
/// Native Linux package managers are invoked through `sudo` unless this
/// returns true.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Check if the current user may create files in `dir`.
///
/// A missing directory counts as not writable.
pub fn is_writable(dir: &std::path::Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        let Ok(path) = std::ffi::CString::new(dir.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: access() only reads the NUL-terminated path for the call
        unsafe { libc::access(path.as_ptr(), libc::W_OK) == 0 }
    }

    #[cfg(not(unix))]
    {
        std::fs::metadata(dir)
            .map(|m| m.is_dir() && !m.permissions().readonly())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::VarError;

    #[test]
    fn temp_dir_is_writable() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(is_writable(temp.path()));
    }

    #[test]
    fn missing_dir_is_not_writable() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(!is_writable(&temp.path().join("missing")));
    }

    #[test]
    fn is_ci_detects_github_actions() {
        let detected = is_ci_with(|key| {
            if key == "GITHUB_ACTIONS" {
                Ok("true".to_string())
            } else {
                Err(VarError::NotPresent)
            }
        });
        assert!(detected);
    }

    #[test]
    fn is_ci_false_without_variables() {
        assert!(!is_ci_with(|_| Err(VarError::NotPresent)));
    }

    #[test]
    fn is_elevated_does_not_panic() {
        let _ = is_elevated();
    }
}
