//! External command execution.
//!
//! Every process envboot spawns goes through a [`CommandRunner`]. Backends
//! and probes hold a runner instead of calling `std::process::Command`
//! directly, so tests can substitute a [`ScriptedRunner`].

use crate::error::{EnvbootError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// The most useful diagnostic text: the tail of stderr, else of stdout.
    pub fn diagnostic(&self) -> String {
        let source = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let lines: Vec<&str> = source.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(DIAGNOSTIC_LINES);
        lines[start..].join("\n")
    }
}

/// Number of trailing output lines kept in failure messages.
const DIAGNOSTIC_LINES: usize = 5;

/// How a spawned command is wired to the terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Environment variables (merged with the inherited environment).
    pub env: HashMap<String, String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,
}

impl CommandOptions {
    /// Capture stdout and stderr.
    pub fn captured() -> Self {
        Self {
            capture_stdout: true,
            ..Default::default()
        }
    }

    /// Stream stdout to the terminal so prompts stay visible. Stderr is
    /// still captured for failure diagnostics.
    pub fn attached() -> Self {
        Self::default()
    }

    /// Set one environment variable for the child.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

/// Something that can run external programs and capture their output.
pub trait CommandRunner {
    /// Run `program` with `args` directly (no shell).
    fn run_with(&self, program: &str, args: &[&str], options: &CommandOptions)
        -> Result<CommandResult>;

    /// Run a script through the platform shell (`sh -c` or PowerShell).
    fn run_shell_with(&self, script: &str, options: &CommandOptions) -> Result<CommandResult>;

    /// [`run_with`](Self::run_with) with all output captured.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult> {
        self.run_with(program, args, &CommandOptions::captured())
    }

    /// [`run_shell_with`](Self::run_shell_with) with all output captured.
    fn run_shell(&self, script: &str) -> Result<CommandResult> {
        self.run_shell_with(script, &CommandOptions::captured())
    }
}

/// Runner that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run_with(
        &self,
        program: &str,
        args: &[&str],
        options: &CommandOptions,
    ) -> Result<CommandResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        capture(cmd, &display_command(program, args), options)
    }

    fn run_shell_with(&self, script: &str, options: &CommandOptions) -> Result<CommandResult> {
        let (shell, flag) = shell_invocation();
        let mut cmd = Command::new(shell);
        if cfg!(target_os = "windows") {
            cmd.arg("-NoProfile");
        }
        cmd.arg(flag).arg(script);
        capture(cmd, script, options)
    }
}

fn capture(mut cmd: Command, shown: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Running: {}", shown);

    for (key, value) in &options.env {
        cmd.env(key, value);
    }
    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    let output = cmd
        .stdin(Stdio::inherit())
        .stderr(Stdio::piped())
        .output()
        .map_err(|_| EnvbootError::CommandFailed {
            command: shown.to_string(),
            code: None,
        })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        tracing::debug!("{} exited with {:?}", shown, output.status.code());
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Shell binary and flag used for [`CommandRunner::run_shell`].
///
/// Uses a plain non-interactive `sh -c` on Unix: installer scripts must not
/// depend on the user's interactive RC files.
fn shell_invocation() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("powershell", "-Command")
    } else {
        ("sh", "-c")
    }
}

/// Render a program and its arguments as a single copy-pasteable line.
pub fn display_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    for arg in args {
        if arg.contains(' ') {
            parts.push(format!("\"{}\"", arg));
        } else {
            parts.push(arg.to_string());
        }
    }
    parts.join(" ")
}

/// Test runner that answers from a script of canned results.
///
/// Commands are matched on their [`display_command`] rendering (or the raw
/// script for `run_shell`). Unscripted commands behave as if the program
/// were missing. Every invocation is recorded along with its options.
///
/// # Example
///
/// ```
/// use envboot::shell::{CommandRunner, ScriptedRunner};
///
/// let runner = ScriptedRunner::new().with_success("node --version", "v20.11.0\n");
/// let result = runner.run("node", &["--version"]).unwrap();
/// assert!(result.success);
/// assert_eq!(runner.calls(), vec!["node --version".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CommandResult>,
    calls: RefCell<Vec<(String, CommandOptions)>>,
}

impl ScriptedRunner {
    /// Create a runner with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful command with the given stdout.
    pub fn with_success(mut self, command: &str, stdout: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO),
        );
        self
    }

    /// Script a failing command with the given exit code and stderr.
    pub fn with_failure(mut self, command: &str, code: i32, stderr: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            CommandResult::failure(Some(code), String::new(), stderr.to_string(), Duration::ZERO),
        );
        self
    }

    /// All commands run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(line, _)| line.clone()).collect()
    }

    /// Options each command was run with, in call order.
    pub fn options(&self) -> Vec<CommandOptions> {
        self.calls.borrow().iter().map(|(_, o)| o.clone()).collect()
    }

    fn answer(&self, line: String, options: &CommandOptions) -> Result<CommandResult> {
        self.calls.borrow_mut().push((line.clone(), options.clone()));
        self.responses
            .get(&line)
            .cloned()
            .ok_or(EnvbootError::CommandFailed {
                command: line,
                code: None,
            })
    }
}

impl CommandRunner for ScriptedRunner {
    fn run_with(
        &self,
        program: &str,
        args: &[&str],
        options: &CommandOptions,
    ) -> Result<CommandResult> {
        self.answer(display_command(program, args), options)
    }

    fn run_shell_with(&self, script: &str, options: &CommandOptions) -> Result<CommandResult> {
        self.answer(script.to_string(), options)
    }
}
