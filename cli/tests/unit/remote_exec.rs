//! Remote executor: helper invocation and outcome classification.

#![allow(clippy::expect_used)]

use std::time::Duration;

use appdeploy_cli::application::ports::{ExecStatus, RemoteShell};
use appdeploy_cli::application::services::remote_exec::RemoteExecutor;
use appdeploy_cli::domain::{PasswordHelper, RunError, Target};

use crate::helpers::{RecordingRunner, err_output, ok_output};

fn target() -> Target {
    Target {
        host: "198.51.100.4".to_string(),
        user: "root".to_string(),
        password: "s3cret pass".to_string(),
        app_dir: "/root/finance-app".to_string(),
    }
}

fn executor(
    results: Vec<Result<std::process::Output, RunError>>,
    helper: PasswordHelper,
) -> RemoteExecutor<RecordingRunner> {
    RemoteExecutor::new(
        RecordingRunner::new(results),
        target(),
        helper,
        Duration::from_secs(300),
    )
}

#[tokio::test]
async fn test_exit_zero_is_success_with_captured_output() {
    let exec = executor(vec![Ok(ok_output(b"Connection established\n"))], PasswordHelper::Expect);
    let outcome = exec.exec("echo 'Connection established'").await;
    assert!(outcome.success());
    assert_eq!(outcome.stdout, "Connection established\n");
    assert_eq!(outcome.stderr, "");
}

#[tokio::test]
async fn test_nonzero_exit_is_failure() {
    let exec = executor(vec![Ok(err_output(1, b"npm ERR! missing script: build"))], PasswordHelper::Expect);
    let outcome = exec.exec("cd /root/finance-app && npm run build").await;
    assert!(!outcome.success());
    assert_eq!(outcome.status, ExecStatus::Exited(Some(1)));
    assert_eq!(outcome.stderr, "npm ERR! missing script: build");
}

#[tokio::test]
async fn test_missing_helper_is_captured_not_thrown() {
    let exec = executor(
        vec![Err(RunError::NotFound {
            program: "expect".to_string(),
        })],
        PasswordHelper::Expect,
    );
    let outcome = exec.exec("true").await;
    assert_eq!(outcome.status, ExecStatus::HelperMissing("expect".to_string()));
    assert_eq!(outcome.stderr, "expect not found");
    assert_eq!(outcome.stdout, "");
}

#[tokio::test]
async fn test_timeout_is_captured_with_timeout_stderr() {
    let exec = executor(
        vec![Err(RunError::Timeout {
            program: "expect".to_string(),
            secs: 300,
        })],
        PasswordHelper::Expect,
    );
    let outcome = exec.exec("cd /root/finance-app && npm install").await;
    assert_eq!(outcome.status, ExecStatus::TimedOut);
    assert_eq!(outcome.stderr, "Timeout");
}

#[tokio::test]
async fn test_io_error_is_spawn_failure() {
    let exec = executor(
        vec![Err(RunError::Io {
            program: "expect".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })],
        PasswordHelper::Expect,
    );
    let outcome = exec.exec("true").await;
    assert!(matches!(outcome.status, ExecStatus::SpawnFailed(_)));
    assert!(outcome.stderr.contains("denied"), "got: {}", outcome.stderr);
}

#[tokio::test]
async fn test_expect_helper_invocation_and_timeout() {
    let exec = executor(vec![], PasswordHelper::Expect);
    exec.exec("pm2 status").await;

    let calls = exec_calls(&exec);
    assert_eq!(calls.len(), 1);
    let (inv, timeout) = &calls[0];
    assert_eq!(inv.program, "expect");
    assert_eq!(inv.args[0], "-c");
    assert!(inv.args[1].contains("root@198.51.100.4 pm2\\ status"), "got: {}", inv.args[1]);
    assert!(inv.args[1].contains(r#"send -- "s3cret\ pass\r""#), "got: {}", inv.args[1]);
    assert_eq!(*timeout, Duration::from_secs(300));
}

#[tokio::test]
async fn test_sshpass_helper_passes_password_in_env() {
    let exec = executor(vec![], PasswordHelper::Sshpass);
    exec.exec("pm2 save").await;

    let calls = exec_calls(&exec);
    let (inv, _) = &calls[0];
    assert_eq!(inv.program, "sshpass");
    assert_eq!(inv.args.last().map(String::as_str), Some("pm2 save"));
    assert!(inv.args.iter().all(|a| !a.contains("s3cret")));
    assert_eq!(inv.env, [("SSHPASS", "s3cret pass".to_string())]);
}

fn exec_calls(
    exec: &RemoteExecutor<RecordingRunner>,
) -> Vec<(appdeploy_cli::domain::Invocation, Duration)> {
    exec.runner().calls.borrow().clone()
}
