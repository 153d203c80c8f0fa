//! Application service — deploy driver.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Steps run strictly in order; the first failure ends the run and no later
//! step is issued.

use std::time::Duration;

use crate::application::ports::{ExecOutcome, ExecStatus, ProgressReporter, RemoteShell};
use crate::domain::{STATUS_COMMAND, Step, StepFailure};

/// Outcome of a completed deploy.
#[derive(Debug)]
pub struct DeployReport {
    /// Number of steps that ran, all successfully.
    pub completed: usize,
    /// Result of the final status query. May itself have failed.
    pub status: ExecOutcome,
}

/// Run every step in `steps`, then query the process supervisor's status.
///
/// Sleeps for `pause` after each successful step, including the last one.
///
/// # Errors
///
/// Returns a [`StepFailure`] for the first step whose outcome is not a
/// success. The status query is not issued in that case.
pub async fn run_deploy(
    shell: &impl RemoteShell,
    reporter: &impl ProgressReporter,
    steps: &[Step],
    pause: Duration,
) -> Result<DeployReport, StepFailure> {
    for (i, step) in steps.iter().enumerate() {
        reporter.step(&format!("{}...", step.label));
        tracing::debug!(step = i + 1, label = step.label, "starting step");

        let outcome = shell.exec(&step.command).await;
        if !outcome.success() {
            reporter.fail(&format!("{} failed", step.label));
            return Err(step_failure(i + 1, step, outcome));
        }

        reporter.success(&format!("{} - done", step.label));
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    let status = query_status(shell).await;
    if !status.success() {
        reporter.warn(&format!("status query failed: {}", status.status));
    }

    Ok(DeployReport {
        completed: steps.len(),
        status,
    })
}

/// Ask the process supervisor for its process table.
pub async fn query_status(shell: &impl RemoteShell) -> ExecOutcome {
    shell.exec(STATUS_COMMAND).await
}

fn step_failure(number: usize, step: &Step, outcome: ExecOutcome) -> StepFailure {
    let missing_helper = match &outcome.status {
        ExecStatus::HelperMissing(program) => Some(program.clone()),
        _ => None,
    };
    StepFailure {
        number,
        label: step.label.to_string(),
        command: step.command.clone(),
        reason: outcome.status.to_string(),
        stderr: outcome.stderr,
        missing_helper,
    }
}
