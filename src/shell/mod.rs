//! Shell command execution and process environment facts.

pub mod command;
pub mod platform;

pub use command::{
    display_command, CommandOptions, CommandResult, CommandRunner, ScriptedRunner, SystemRunner,
};
pub use platform::{is_ci, is_ci_with, is_elevated, is_writable};
