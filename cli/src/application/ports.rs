//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{DeployConfig, Invocation, RunError};

// ── Value Types ───────────────────────────────────────────────────────────────

/// How a remote command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecStatus {
    /// The session closed with exit code 0.
    Succeeded,
    /// The session closed with a non-zero code, or was killed by a signal.
    Exited(Option<i32>),
    /// The command did not finish within the timeout and was killed.
    TimedOut,
    /// The password helper is not installed locally.
    HelperMissing(String),
    /// The helper could not be started for another reason.
    SpawnFailed(String),
}

impl std::fmt::Display for ExecStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Succeeded => f.write_str("succeeded"),
            Self::Exited(Some(code)) => write!(f, "exit code {code}"),
            Self::Exited(None) => f.write_str("terminated by signal"),
            Self::TimedOut => f.write_str("timed out"),
            Self::HelperMissing(program) => write!(f, "{program} not found"),
            Self::SpawnFailed(reason) => f.write_str(reason),
        }
    }
}

/// Captured result of one remote command. Never an error: failures are data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutcome {
    pub status: ExecStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == ExecStatus::Succeeded
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts local process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `invocation` to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::NotFound`] if the program is not on `PATH`,
    /// [`RunError::Timeout`] if it exceeds `timeout` (the child must be
    /// killed, not left orphaned), and [`RunError::Io`] for anything else.
    async fn run(&self, invocation: &Invocation, timeout: Duration) -> Result<Output, RunError>;
}

// ── Remote Shell Port ─────────────────────────────────────────────────────────

/// Runs one shell command on the deployment target.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// Execute `command` remotely. Failures are reported in the outcome.
    async fn exec(&self, command: &str) -> ExecOutcome;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a failure message for the step in progress.
    fn fail(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the optional configuration file.
pub trait ConfigStore {
    /// Load the config, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<DeployConfig>;
    /// Path the config is read from.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
