//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;
use crate::domain::{Invocation, RunError};

/// Production `CommandRunner` — uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// On Windows, `tokio::time::timeout` around `.output().await` does NOT kill
/// the child process when the timeout fires — the future is dropped but the
/// OS process keeps running. This implementation uses `tokio::select!` with
/// explicit `child.kill()` to guarantee the process is terminated.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation, timeout: Duration) -> Result<Output, RunError> {
        let program = invocation.program;
        let mut child = tokio::process::Command::new(program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (*k, v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| spawn_error(program, source))?;

        tracing::debug!(program, pid = child.id(), "spawned");

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                status
                    .map(|status| Output { status, stdout, stderr })
                    .map_err(|source| RunError::Io {
                        program: program.to_string(),
                        source,
                    })
            } => result,
            () = tokio::time::sleep(timeout) => {
                tracing::warn!(program, secs = timeout.as_secs(), "killing after timeout");
                let _ = child.kill().await;
                Err(RunError::Timeout {
                    program: program.to_string(),
                    secs: timeout.as_secs(),
                })
            }
        }
    }
}

fn spawn_error(program: &str, source: std::io::Error) -> RunError {
    if source.kind() == std::io::ErrorKind::NotFound {
        RunError::NotFound {
            program: program.to_string(),
        }
    } else {
        RunError::Io {
            program: program.to_string(),
            source,
        }
    }
}
