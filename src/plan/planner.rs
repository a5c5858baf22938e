//! Turns requirements and probe results into a plan.

use super::action::{Action, PlanResult, SkipReason};
use crate::backend::{candidates, BackendKind, BackendSet};
use crate::probe::{detect_tool, Platform, ToolProbe};
use crate::requirements::Requirement;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Computes plans against a probe and a set of backends.
pub struct Planner<'a> {
    probe: &'a dyn ToolProbe,
    backends: &'a BackendSet,
    available: RefCell<HashMap<BackendKind, bool>>,
}

impl<'a> Planner<'a> {
    pub fn new(probe: &'a dyn ToolProbe, backends: &'a BackendSet) -> Self {
        Self {
            probe,
            backends,
            available: RefCell::new(HashMap::new()),
        }
    }

    /// Plan every requirement, in declaration order.
    ///
    /// A backend that an earlier planned action will provide (npm once
    /// Node.js is installed) counts as available for later requirements.
    pub fn plan(&self, requirements: &[Requirement], platform: &Platform) -> PlanResult {
        let candidates = candidates(platform);
        let mut provided: HashSet<BackendKind> = HashSet::new();
        let mut actions = Vec::with_capacity(requirements.len());

        for requirement in requirements {
            let action = self.plan_one(requirement, platform, &candidates, &provided);
            tracing::debug!("Planned: {}", action);
            if action.is_work() {
                if let Some(kind) = requirement.provides {
                    provided.insert(kind);
                }
            }
            actions.push(action);
        }

        PlanResult { actions }
    }

    fn plan_one(
        &self,
        requirement: &Requirement,
        platform: &Platform,
        candidates: &[BackendKind],
        provided: &HashSet<BackendKind>,
    ) -> Action {
        let skip = |reason| Action::Skip {
            requirement: requirement.clone(),
            reason,
        };

        if !requirement.supports_os(platform) {
            return skip(SkipReason::UnsupportedPlatform);
        }

        let status = detect_tool(self.probe, requirement);
        if status.is_satisfied() {
            return skip(SkipReason::AlreadySatisfied);
        }

        let usable = usable_backends(requirement, candidates);
        if usable.is_empty() {
            return skip(SkipReason::UnsupportedPlatform);
        }

        let Some(backend) = usable
            .into_iter()
            .find(|k| provided.contains(k) || self.is_available(*k))
        else {
            return skip(SkipReason::NoBackendAvailable);
        };

        if status.installed {
            Action::Upgrade {
                requirement: requirement.clone(),
                backend,
                from: status.installed_version,
                to: requirement
                    .min_version
                    .map(|m| format!(">= {}", m))
                    .unwrap_or_else(|| "latest".to_string()),
            }
        } else {
            Action::Install {
                requirement: requirement.clone(),
                backend,
            }
        }
    }

    /// The backend a single requirement would use right now, ignoring its
    /// installed state.
    pub fn select_backend(
        &self,
        requirement: &Requirement,
        platform: &Platform,
    ) -> Option<BackendKind> {
        if !requirement.supports_os(platform) {
            return None;
        }
        usable_backends(requirement, &candidates(platform))
            .into_iter()
            .find(|k| self.is_available(*k))
    }

    /// Availability is checked once per backend per planner.
    fn is_available(&self, kind: BackendKind) -> bool {
        if let Some(known) = self.available.borrow().get(&kind) {
            return *known;
        }
        let available = self
            .backends
            .get(kind)
            .map(|b| b.is_available())
            .unwrap_or(false);
        self.available.borrow_mut().insert(kind, available);
        available
    }
}

/// Declared backends that are candidates on this platform, in declaration
/// order.
fn usable_backends(requirement: &Requirement, candidates: &[BackendKind]) -> Vec<BackendKind> {
    requirement
        .backends
        .iter()
        .map(|b| b.kind)
        .filter(|k| candidates.contains(k))
        .collect()
}
