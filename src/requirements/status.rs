//! Probed status of a requirement.
//!
//! A `ToolStatus` is derived by probing the live machine and is never
//! cached: external installers can change the system at any time.

use serde::Serialize;

/// The result of probing a single requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    /// The requirement name that was probed.
    pub requirement: String,
    /// Whether the tool's binary was found.
    pub installed: bool,
    /// Version reported by the tool, if any.
    pub installed_version: Option<String>,
    /// Whether the installed version satisfies the declared minimum.
    /// Always false when not installed.
    pub meets_minimum: bool,
}

impl ToolStatus {
    /// Status for a tool that is not installed.
    pub fn missing(requirement: &str) -> Self {
        Self {
            requirement: requirement.to_string(),
            installed: false,
            installed_version: None,
            meets_minimum: false,
        }
    }

    /// Whether nothing needs to be done for this requirement.
    pub fn is_satisfied(&self) -> bool {
        self.installed && self.meets_minimum
    }

    /// Version for display, `-` when unknown.
    pub fn version_label(&self) -> &str {
        self.installed_version.as_deref().unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_is_not_satisfied() {
        let status = ToolStatus::missing("node");
        assert!(!status.installed);
        assert!(!status.meets_minimum);
        assert!(!status.is_satisfied());
        assert_eq!(status.version_label(), "-");
    }

    #[test]
    fn installed_below_minimum_is_not_satisfied() {
        let status = ToolStatus {
            requirement: "node".to_string(),
            installed: true,
            installed_version: Some("16.20.0".to_string()),
            meets_minimum: false,
        };
        assert!(!status.is_satisfied());
        assert_eq!(status.version_label(), "16.20.0");
    }

    #[test]
    fn installed_and_meeting_minimum_is_satisfied() {
        let status = ToolStatus {
            requirement: "node".to_string(),
            installed: true,
            installed_version: None,
            meets_minimum: true,
        };
        assert!(status.is_satisfied());
    }
}
