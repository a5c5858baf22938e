//! PATH management.
//!
//! A freshly installed tool is often in a directory the current shell does
//! not search. [`PathMutator`] fixes that for the rest of this run and for
//! every future session.

pub mod mutator;
pub mod session;
pub mod shell_config;

pub use mutator::{PathMutator, PathUpdate};
pub use session::{MemoryEnv, ProcessEnv, SessionEnv};
pub use shell_config::{config_file_for, path_line, MARKER};
