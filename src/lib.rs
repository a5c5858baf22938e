//! envboot - Declarative, idempotent developer environment bootstrap.
//!
//! envboot brings a machine to a known-good state: a list of required tools
//! is probed, planned against the package managers available on the
//! platform, installed in dependency order, and verified.
//!
//! # Modules
//!
//! - [`probe`] - Platform detection and tool probing
//! - [`requirements`] - Requirement declarations and probed status
//! - [`backend`] - Package manager adapters
//! - [`plan`] - Turning requirements and probe results into actions
//! - [`executor`] - Running a plan and verifying the result
//! - [`path`] - Idempotent PATH extension
//! - [`config`] - Configuration loading, merging, and validation
//! - [`cli`] - Command-line interface and argument parsing
//! - [`shell`] - Process spawning
//! - [`ui`] - Spinners, prompts, and terminal output
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use envboot::backend::{BackendKind, BackendSet, FakeBackend, FakeSystem};
//! use envboot::plan::Planner;
//! use envboot::probe::{Arch, LinuxDistro, OsFamily, Platform, ShellKind};
//! use envboot::requirements::builtin_requirements;
//!
//! let system = FakeSystem::new();
//! let backends = BackendSet::new().with(Box::new(FakeBackend::new(BackendKind::Apt, &system)));
//! let debian = Platform::new(OsFamily::Linux(LinuxDistro::Debian), Arch::X64, ShellKind::Bash);
//!
//! let plan = Planner::new(&system, &backends).plan(&builtin_requirements(), &debian);
//! assert_eq!(plan.work_count(), 2);
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod path;
pub mod plan;
pub mod probe;
pub mod requirements;
pub mod shell;
pub mod ui;

pub use error::{EnvbootError, Result};
