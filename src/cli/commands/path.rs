//! Path command implementation.
//!
//! `envboot path <dir>` persists a directory to the shell config file.

use std::path::PathBuf;

use crate::cli::args::PathArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::context::MachineContext;
use super::dispatcher::{Command, CommandResult};

/// The path command implementation.
pub struct PathCommand<'a> {
    ctx: &'a MachineContext,
    args: PathArgs,
}

impl<'a> PathCommand<'a> {
    pub fn new(ctx: &'a MachineContext, args: PathArgs) -> Self {
        Self { ctx, args }
    }

    fn absolute_dir(&self) -> Result<PathBuf> {
        if self.args.dir.is_absolute() {
            Ok(self.args.dir.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.args.dir))
        }
    }
}

impl Command for PathCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(mutator) = &self.ctx.path else {
            ui.error("PATH updates are unavailable: cannot locate a shell config file");
            return Ok(CommandResult::failure(1));
        };

        let dir = self.absolute_dir()?;
        if !dir.is_dir() {
            ui.warning(&format!("{} does not exist yet", dir.display()));
        }

        let update = mutator.ensure_on_path(&dir)?;
        let config = mutator.config_file().display();
        if update.persisted {
            ui.success(&format!("Added {} to PATH in {}", dir.display(), config));
            ui.show_hint("Open a new shell, or source the file, to pick up the change");
        } else {
            ui.success(&format!("{} is already configured in {}", dir.display(), config));
        }

        Ok(CommandResult::success())
    }
}
