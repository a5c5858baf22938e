//! What happened during a run.

use crate::path::PathUpdate;
use crate::plan::{Action, SkipReason};
use crate::requirements::ToolStatus;
use serde::Serialize;
use std::fmt;

/// Result of executing one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed(String),
    /// The action was a planned skip; nothing ran.
    Skipped,
}

/// One executed action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    pub action: Action,
    pub outcome: Outcome,
    /// PATH change made to expose the installed tool, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_update: Option<PathUpdate>,
    /// What the user can run by hand after a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ActionReport {
    pub fn skipped(action: &Action) -> Self {
        Self {
            action: action.clone(),
            outcome: Outcome::Skipped,
            path_update: None,
            remediation: None,
        }
    }
}

/// Final state of a requirement, as shown in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    Installed,
    Upgraded,
    AlreadySatisfied,
    Failed,
    SkippedUnsupported,
    SkippedNoBackend,
    /// The installer succeeded but the binary is not reachable through PATH.
    InstalledNotOnPath,
}

impl FinalStatus {
    /// Derive the final status from an action, its outcome and the
    /// post-run probe.
    pub fn derive(report: &ActionReport, status: &ToolStatus) -> Self {
        match (&report.outcome, &report.action) {
            (Outcome::Failed(_), _) => Self::Failed,
            (Outcome::Skipped, action) => match action.skip_reason() {
                Some(SkipReason::AlreadySatisfied) => Self::AlreadySatisfied,
                Some(SkipReason::NoBackendAvailable) => Self::SkippedNoBackend,
                _ => Self::SkippedUnsupported,
            },
            (Outcome::Succeeded, _) if !status.installed => Self::InstalledNotOnPath,
            (Outcome::Succeeded, Action::Upgrade { .. }) => Self::Upgraded,
            (Outcome::Succeeded, _) => Self::Installed,
        }
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Installed => "Installed",
            Self::Upgraded => "Upgraded",
            Self::AlreadySatisfied => "Already satisfied",
            Self::Failed => "Failed",
            Self::SkippedUnsupported => "Skipped (unsupported platform)",
            Self::SkippedNoBackend => "Skipped (no backend available)",
            Self::InstalledNotOnPath => "Installed (not on PATH)",
        })
    }
}

/// Post-run probe of one requirement.
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub status: ToolStatus,
    pub final_status: FinalStatus,
}

/// Everything a run did, in plan order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionReport {
    pub actions: Vec<ActionReport>,
    pub verification: Vec<Verification>,
}

impl ExecutionReport {
    /// True when every action that ran succeeded. Skips never count against
    /// success, and neither does a tool that installed but is not on PATH.
    pub fn success(&self) -> bool {
        self.actions
            .iter()
            .filter(|r| r.outcome != Outcome::Skipped)
            .all(|r| r.outcome == Outcome::Succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionReport> {
        self.actions
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed(_)))
    }

    /// The report for a requirement.
    pub fn get(&self, name: &str) -> Option<&ActionReport> {
        self.actions
            .iter()
            .find(|r| r.action.requirement().name == name)
    }

    /// The final status for a requirement.
    pub fn final_status(&self, name: &str) -> Option<&FinalStatus> {
        self.verification
            .iter()
            .find(|v| v.status.requirement == name)
            .map(|v| &v.final_status)
    }
}
