//! Shared display helpers.
//!
//! Used by `run`, `plan`, `tool` and `diagnose` to render plans and final
//! statuses consistently.

use crate::executor::{ExecutionReport, FinalStatus, Outcome};
use crate::plan::{Action, PlanResult};
use crate::ui::{StatusKind, Summary, SummaryRow, Table};

/// Icon category for a final status.
pub fn status_kind(status: &FinalStatus) -> StatusKind {
    match status {
        FinalStatus::Installed | FinalStatus::Upgraded | FinalStatus::AlreadySatisfied => {
            StatusKind::Success
        }
        FinalStatus::Failed => StatusKind::Failed,
        FinalStatus::SkippedUnsupported | FinalStatus::SkippedNoBackend => StatusKind::Skipped,
        FinalStatus::InstalledNotOnPath => StatusKind::Warning,
    }
}

/// Build the end-of-run summary from an execution report.
pub fn summary(report: &ExecutionReport) -> Summary {
    let rows = report
        .actions
        .iter()
        .zip(&report.verification)
        .map(|(action, verification)| {
            let detail = match &action.outcome {
                Outcome::Failed(message) => message.clone(),
                _ => verification.status.version_label().to_string(),
            };
            SummaryRow {
                name: action.action.requirement().name.clone(),
                status: status_kind(&verification.final_status),
                label: verification.final_status.to_string(),
                detail,
                remediation: action.remediation.clone(),
            }
        })
        .collect();

    Summary {
        rows,
        success: report.success(),
    }
}

/// Render a plan as a table.
pub fn plan_table(plan: &PlanResult) -> Table {
    let mut table = Table::new(&["#", "Requirement", "Action", "Backend", "Detail"]);
    for (index, action) in plan.actions.iter().enumerate() {
        let (verb, detail) = match action {
            Action::Install { .. } => ("install", String::new()),
            Action::Upgrade { from, to, .. } => (
                "upgrade",
                format!("{} -> {}", from.as_deref().unwrap_or("unknown"), to),
            ),
            Action::Skip { reason, .. } => ("skip", reason.to_string()),
        };
        table.add_row(vec![
            (index + 1).to_string(),
            action.requirement().name.clone(),
            verb.to_string(),
            action
                .backend()
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string()),
            detail,
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use crate::executor::{ActionReport, Verification};
    use crate::plan::SkipReason;
    use crate::requirements::{Requirement, ToolStatus};

    #[test]
    fn status_kind_mapping() {
        assert_eq!(status_kind(&FinalStatus::Upgraded), StatusKind::Success);
        assert_eq!(status_kind(&FinalStatus::Failed), StatusKind::Failed);
        assert_eq!(status_kind(&FinalStatus::SkippedNoBackend), StatusKind::Skipped);
        assert_eq!(status_kind(&FinalStatus::InstalledNotOnPath), StatusKind::Warning);
    }

    #[test]
    fn summary_carries_failure_message_and_remediation() {
        let action = Action::Install {
            requirement: Requirement::new("node"),
            backend: BackendKind::Apt,
        };
        let report = ExecutionReport {
            actions: vec![ActionReport {
                action,
                outcome: Outcome::Failed("exit 100".to_string()),
                path_update: None,
                remediation: Some("sudo apt-get install -y nodejs".to_string()),
            }],
            verification: vec![Verification {
                status: ToolStatus::missing("node"),
                final_status: FinalStatus::Failed,
            }],
        };

        let summary = summary(&report);
        assert!(!summary.success);
        assert_eq!(summary.rows[0].detail, "exit 100");
        assert_eq!(summary.rows[0].label, "Failed");
        assert_eq!(
            summary.rows[0].remediation.as_deref(),
            Some("sudo apt-get install -y nodejs")
        );
    }

    #[test]
    fn plan_table_lists_every_action() {
        let plan = PlanResult {
            actions: vec![
                Action::Skip {
                    requirement: Requirement::new("homebrew"),
                    reason: SkipReason::UnsupportedPlatform,
                },
                Action::Upgrade {
                    requirement: Requirement::new("node"),
                    backend: BackendKind::Apt,
                    from: Some("16.20.2".to_string()),
                    to: ">= 18".to_string(),
                },
            ],
        };
        let table = plan_table(&plan);
        assert_eq!(table.row_count(), 2);
        let rendered = table.render();
        assert!(rendered.contains("unsupported platform"));
        assert!(rendered.contains("16.20.2 -> >= 18"));
    }
}
