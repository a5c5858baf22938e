//! The live session's PATH.

use crate::error::{EnvbootError, Result};
use crate::probe::parse_system_path;
use std::cell::RefCell;
use std::path::PathBuf;

/// Read and replace the PATH seen by this run.
pub trait SessionEnv {
    /// Current PATH entries, in order.
    fn path_entries(&self) -> Vec<PathBuf>;

    /// Replace the PATH entries.
    fn set_path_entries(&self, entries: &[PathBuf]) -> Result<()>;
}

/// The real process environment.
///
/// Changes are inherited by child processes spawned afterwards but never
/// reach the parent shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl SessionEnv for ProcessEnv {
    fn path_entries(&self) -> Vec<PathBuf> {
        parse_system_path()
    }

    fn set_path_entries(&self, entries: &[PathBuf]) -> Result<()> {
        let joined = std::env::join_paths(entries).map_err(|e| {
            EnvbootError::Other(anyhow::anyhow!("Cannot build PATH value: {}", e))
        })?;
        std::env::set_var("PATH", joined);
        Ok(())
    }
}

/// An in-memory PATH, used in tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryEnv {
    entries: RefCell<Vec<PathBuf>>,
}

impl MemoryEnv {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self {
            entries: RefCell::new(entries),
        }
    }
}

impl SessionEnv for MemoryEnv {
    fn path_entries(&self) -> Vec<PathBuf> {
        self.entries.borrow().clone()
    }

    fn set_path_entries(&self, entries: &[PathBuf]) -> Result<()> {
        *self.entries.borrow_mut() = entries.to_vec();
        Ok(())
    }
}
