//! Command-line interface for envboot.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompletionsArgs, DiagnoseArgs, PathArgs, PlanArgs, RunArgs, ToolArgs,
    ToolOperation,
};
pub use commands::{Command, CommandDispatcher, CommandResult, MachineContext};
