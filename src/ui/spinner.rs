//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::EnvbootTheme;
use super::SpinnerHandle;

/// A progress spinner shown while an installer runs.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: EnvbootTheme,
}

impl ProgressSpinner {
    pub fn new(message: &str, theme: EnvbootTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar, theme }
    }

    /// A spinner that draws nothing (for silent mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: EnvbootTheme::plain(),
        }
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish_with(line);
    }

    fn suspend(&mut self, work: &mut dyn FnMut()) {
        self.bar.suspend(|| work());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_spinner_finishes_quietly() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.set_message("Installing node");
        spinner.finish_success("node installed");
        assert!(spinner.bar.is_finished());
    }

    #[test]
    fn suspended_spinner_runs_work() {
        let mut spinner = ProgressSpinner::new("Installing node", EnvbootTheme::plain());
        let mut ran = false;
        spinner.suspend(&mut || ran = true);
        spinner.finish_success("node installed");
        assert!(ran);
        assert!(spinner.bar.is_finished());
    }

    #[test]
    fn spinner_finish_variants() {
        let mut ok = ProgressSpinner::new("Working", EnvbootTheme::plain());
        ok.finish_success("done");
        assert!(ok.bar.is_finished());

        let mut failed = ProgressSpinner::new("Working", EnvbootTheme::plain());
        failed.finish_error("failed");
        assert!(failed.bar.is_finished());

        let mut skipped = ProgressSpinner::new("Working", EnvbootTheme::plain());
        skipped.finish_skipped("skipped");
        assert!(skipped.bar.is_finished());
    }
}
