//! Plan actions.

use crate::backend::BackendKind;
use crate::requirements::Requirement;
use serde::{Serialize, Serializer};
use std::fmt;

/// Why a requirement needs no work, or cannot get any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Installed and meets the minimum version.
    AlreadySatisfied,
    /// Not meant for this platform, or no declared backend works here.
    UnsupportedPlatform,
    /// Backends exist for this platform but none is installed.
    NoBackendAvailable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlreadySatisfied => "already satisfied",
            Self::UnsupportedPlatform => "unsupported platform",
            Self::NoBackendAvailable => "no backend available",
        })
    }
}

fn requirement_name<S: Serializer>(requirement: &Requirement, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&requirement.name)
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Install {
        #[serde(serialize_with = "requirement_name")]
        requirement: Requirement,
        backend: BackendKind,
    },
    Upgrade {
        #[serde(serialize_with = "requirement_name")]
        requirement: Requirement,
        backend: BackendKind,
        /// Installed version, if it could be read.
        from: Option<String>,
        /// Target, as a minimum constraint such as ">= 18".
        to: String,
    },
    Skip {
        #[serde(serialize_with = "requirement_name")]
        requirement: Requirement,
        reason: SkipReason,
    },
}

impl Action {
    pub fn requirement(&self) -> &Requirement {
        match self {
            Self::Install { requirement, .. }
            | Self::Upgrade { requirement, .. }
            | Self::Skip { requirement, .. } => requirement,
        }
    }

    /// The backend that will run this action.
    pub fn backend(&self) -> Option<BackendKind> {
        match self {
            Self::Install { backend, .. } | Self::Upgrade { backend, .. } => Some(*backend),
            Self::Skip { .. } => None,
        }
    }

    /// Whether this action changes the machine.
    pub fn is_work(&self) -> bool {
        !matches!(self, Self::Skip { .. })
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Skip { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install {
                requirement,
                backend,
            } => write!(f, "install {} via {}", requirement.name, backend),
            Self::Upgrade {
                requirement,
                backend,
                from,
                to,
            } => write!(
                f,
                "upgrade {} from {} to {} via {}",
                requirement.name,
                from.as_deref().unwrap_or("unknown"),
                to,
                backend
            ),
            Self::Skip {
                requirement,
                reason,
            } => write!(f, "skip {} ({})", requirement.name, reason),
        }
    }
}

/// Ordered actions, one per requirement, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanResult {
    pub actions: Vec<Action>,
}

impl PlanResult {
    /// Number of actions that will change the machine.
    pub fn work_count(&self) -> usize {
        self.actions.iter().filter(|a| a.is_work()).count()
    }

    pub fn has_work(&self) -> bool {
        self.work_count() > 0
    }

    /// Whether any requirement was skipped for `reason`.
    pub fn has_skip(&self, reason: SkipReason) -> bool {
        self.actions.iter().any(|a| a.skip_reason() == Some(reason))
    }

    /// Position of a requirement's action.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.actions
            .iter()
            .position(|a| a.requirement().name == name)
    }
}
