//! Non-interactive UI for CI/headless environments.

use crate::error::Result;
use crate::shell::is_ci;

use super::theme::EnvbootTheme;
use super::{OutputMode, Prompt, SpinnerHandle, Summary, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Prompts answer with their default. Spinners become one line when an
/// operation starts and one when it ends, which reads well in CI logs.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: EnvbootTheme,
    is_ci: bool,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: EnvbootTheme::for_stdout(),
            is_ci: is_ci(),
        }
    }

    /// Create with an explicit CI flag (for testing).
    pub fn with_ci(mode: OutputMode, is_ci: bool) -> Self {
        Self {
            mode,
            theme: EnvbootTheme::plain(),
            is_ci,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_summary() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        tracing::debug!(
            "Non-interactive: answering '{}' with {}",
            prompt.key,
            prompt.default
        );
        Ok(prompt.default)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner {
            theme: self.theme.clone(),
            visible: self.mode.shows_spinners(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", self.theme.format_header(title));
        }
    }

    fn show_hint(&mut self, hint: &str) {
        // CI logs are read after the fact; hints about what to type next are noise.
        if self.mode.shows_status() && !self.is_ci {
            println!("  {}", hint);
        }
    }

    fn show_error_block(&mut self, title: &str, output: &str, hint: Option<&str>) {
        eprintln!("    ┌─ {}", title);
        for line in output.lines() {
            eprintln!("    │ {}", line);
        }
        eprintln!("    └──────────────────────────────────");
        if let Some(h) = hint {
            eprintln!("    Hint: {}", h);
        }
    }

    fn show_summary(&mut self, summary: &Summary) {
        if !self.mode.shows_summary() {
            return;
        }
        println!();
        println!("{}", summary.render(&self.theme));
        println!();
        if summary.success {
            println!("{}", self.theme.format_success("Environment ready"));
        } else {
            eprintln!("{}", self.theme.format_error("Some tools could not be installed"));
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner replacement that prints the final status line.
struct LineSpinner {
    theme: EnvbootTheme,
    visible: bool,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.visible {
            println!("  {}", self.theme.format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if self.visible {
            println!("  {}", self.theme.format_error(msg));
        }
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.visible {
            println!("  {}", self.theme.format_skipped(msg));
        }
    }
}
