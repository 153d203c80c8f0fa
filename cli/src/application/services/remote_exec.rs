//! Application service — remote command executor.
//!
//! Wraps a [`CommandRunner`] so that one shell command runs on the target
//! through the configured password helper. Every failure mode is folded into
//! an [`ExecOutcome`]; nothing here returns an error.

use std::time::Duration;

use crate::application::ports::{CommandRunner, ExecOutcome, ExecStatus, RemoteShell};
use crate::domain::login::remote_invocation;
use crate::domain::{PasswordHelper, RunError, Target};

/// Runs remote commands on one fixed target.
pub struct RemoteExecutor<R: CommandRunner> {
    runner: R,
    target: Target,
    helper: PasswordHelper,
    timeout: Duration,
}

impl<R: CommandRunner> RemoteExecutor<R> {
    pub fn new(runner: R, target: Target, helper: PasswordHelper, timeout: Duration) -> Self {
        Self {
            runner,
            target,
            helper,
            timeout,
        }
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> RemoteShell for RemoteExecutor<R> {
    async fn exec(&self, command: &str) -> ExecOutcome {
        let invocation = remote_invocation(self.helper, &self.target, command, self.timeout);
        tracing::debug!(
            helper = %self.helper,
            host = %self.target.host,
            timeout_secs = self.timeout.as_secs(),
            "running remote command"
        );

        match self.runner.run(&invocation, self.timeout).await {
            Ok(output) => {
                let status = if output.status.success() {
                    ExecStatus::Succeeded
                } else {
                    ExecStatus::Exited(output.status.code())
                };
                ExecOutcome {
                    status,
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }
            }
            Err(RunError::NotFound { program }) => {
                tracing::warn!(%program, "password helper not found");
                ExecOutcome {
                    stderr: format!("{program} not found"),
                    status: ExecStatus::HelperMissing(program),
                    stdout: String::new(),
                }
            }
            Err(RunError::Timeout { program, secs }) => {
                tracing::warn!(%program, secs, "remote command timed out");
                ExecOutcome {
                    status: ExecStatus::TimedOut,
                    stdout: String::new(),
                    stderr: "Timeout".to_string(),
                }
            }
            Err(e @ RunError::Io { .. }) => ExecOutcome {
                stderr: e.to_string(),
                status: ExecStatus::SpawnFailed(e.to_string()),
                stdout: String::new(),
            },
        }
    }
}
