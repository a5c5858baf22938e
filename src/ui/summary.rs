//! End-of-run summary.

use super::icons::StatusKind;
use super::table::Table;
use super::theme::EnvbootTheme;

/// One requirement's final state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub name: String,
    pub status: StatusKind,
    /// Status text, e.g. "Installed" or "Skipped (unsupported platform)".
    pub label: String,
    /// Version or failure message.
    pub detail: String,
    /// What the user can do by hand, for failures.
    pub remediation: Option<String>,
}

/// Every requirement's final state plus the overall verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
    pub success: bool,
}

impl Summary {
    /// Rows that need the user's attention.
    pub fn failures(&self) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(|r| r.status == StatusKind::Failed)
    }

    /// Render the table followed by one remediation line per failure.
    pub fn render(&self, theme: &EnvbootTheme) -> String {
        let mut table = Table::new(&["", "Tool", "Status", "Details"]);
        for row in &self.rows {
            table.add_row(vec![
                row.status.styled(theme),
                row.name.clone(),
                row.label.clone(),
                theme.dim.apply_to(&row.detail).to_string(),
            ]);
        }

        let mut out = table.render();
        for row in self.failures() {
            if let Some(fix) = &row.remediation {
                out.push_str(&format!(
                    "\n{} {}",
                    theme.hint.apply_to(format!("To install {} manually:", row.name)),
                    theme.command.apply_to(fix)
                ));
            }
        }
        out
    }
}
