//! Idempotent PATH extension.

use super::session::SessionEnv;
use super::shell_config::{config_file_for, path_line, MARKER};
use crate::error::{EnvbootError, Result};
use crate::probe::{Platform, ShellKind};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// What [`PathMutator::ensure_on_path`] found and changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathUpdate {
    /// The live session's PATH already held the directory.
    pub already_present: bool,
    /// A line was appended to the shell config file by this call.
    pub persisted: bool,
}

/// Ensures directories are on PATH for this run and for future sessions.
///
/// The two targets are independent. The live session (a [`SessionEnv`])
/// only affects this process and its children. The shell config file only
/// affects shells started later; shells that are already running never see
/// the change.
pub struct PathMutator {
    session: Rc<dyn SessionEnv>,
    shell: ShellKind,
    config_file: PathBuf,
}

impl PathMutator {
    /// Create a mutator writing to an explicit config file.
    pub fn new(
        session: Rc<dyn SessionEnv>,
        shell: ShellKind,
        config_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            session,
            shell,
            config_file: config_file.into(),
        }
    }

    /// Create a mutator for the detected platform's shell, under the user's
    /// home directory.
    pub fn for_platform(session: Rc<dyn SessionEnv>, platform: &Platform) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            EnvbootError::Other(anyhow::anyhow!("Cannot determine home directory"))
        })?;
        let documents = dirs::document_dir().unwrap_or_else(|| home.join("Documents"));
        let file = config_file_for(platform.shell, platform.os, &home, &documents);
        Ok(Self::new(session, platform.shell, file))
    }

    /// The shell config file this mutator appends to.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Make `dir` part of PATH in the live session and in the shell config.
    ///
    /// Calling this repeatedly with the same directory never duplicates it in
    /// either place.
    pub fn ensure_on_path(&self, dir: &Path) -> Result<PathUpdate> {
        let mut entries = self.session.path_entries();
        let already_present = entries.iter().any(|e| e == dir);
        if !already_present {
            entries.insert(0, dir.to_path_buf());
            self.session.set_path_entries(&entries)?;
            tracing::debug!("Added {} to session PATH", dir.display());
        }

        let persisted = self.persist(dir)?;
        Ok(PathUpdate {
            already_present,
            persisted,
        })
    }

    fn persist(&self, dir: &Path) -> Result<bool> {
        // Shell rc files are not guaranteed to be UTF-8.
        let bytes = match fs::read(&self.config_file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let existing = String::from_utf8_lossy(&bytes);

        if existing.contains(&*dir.to_string_lossy()) {
            tracing::debug!(
                "{} already mentions {}",
                self.config_file.display(),
                dir.display()
            );
            return Ok(false);
        }

        if let Some(parent) = self.config_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut block = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            block.push('\n');
        }
        block.push('\n');
        block.push_str(MARKER);
        block.push('\n');
        block.push_str(&path_line(self.shell, dir));
        block.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config_file)?;
        file.write_all(block.as_bytes())?;

        tracing::info!(
            "Added {} to PATH in {}",
            dir.display(),
            self.config_file.display()
        );
        Ok(true)
    }
}
