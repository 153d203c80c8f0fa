//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Process errors ────────────────────────────────────────────────────────────

/// Why a local process produced no exit status.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{program} not found")]
    NotFound { program: String },

    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

// ── Step errors ───────────────────────────────────────────────────────────────

/// The single run-level failure: one step did not succeed.
///
/// Carries the step's position, label and command so the caller can print
/// diagnostics, plus the captured stderr of the failed attempt.
#[derive(Debug, Error)]
#[error("step {number} '{label}' failed: {reason}")]
pub struct StepFailure {
    /// 1-based position in the plan.
    pub number: usize,
    pub label: String,
    pub command: String,
    pub reason: String,
    pub stderr: String,
    /// Set when the password helper itself is not installed locally.
    pub missing_helper: Option<String>,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must not be empty")]
    Empty { key: &'static str },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: &'static str,
        value: String,
        valid: String,
    },

    #[error("target.app_dir must be an absolute path, got '{0}'")]
    RelativeAppDir(String),

    #[error("run.timeout_secs must be greater than zero")]
    ZeroTimeout,
}
