//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and reads the machine
//! through a [`MachineContext`], so every command can run against the fake
//! backends in tests.

pub mod completions;
pub mod context;
pub mod diagnose;
pub mod dispatcher;
pub mod display;
pub mod path;
pub mod plan;
pub mod run;
pub mod tool;

pub use context::MachineContext;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
