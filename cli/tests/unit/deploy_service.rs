//! Deploy driver: ordering, first-failure halt, and status query.

#![allow(clippy::expect_used)]

use std::time::Duration;

use appdeploy_cli::application::ports::{ExecOutcome, ExecStatus};
use appdeploy_cli::application::services::deploy::run_deploy;
use appdeploy_cli::domain::{AppSpec, STATUS_COMMAND, Target, deploy_steps};

use crate::helpers::{Event, RecordingReporter, RecordingShell, outcome_exit, outcome_ok};

fn plan() -> Vec<appdeploy_cli::domain::Step> {
    deploy_steps(&Target::default(), &AppSpec::default())
}

#[tokio::test]
async fn test_all_steps_run_in_declared_order_then_status() {
    let steps = plan();
    let shell = RecordingShell::always_ok();
    let reporter = RecordingReporter::default();

    let report = run_deploy(&shell, &reporter, &steps, Duration::ZERO)
        .await
        .expect("all steps succeed");

    let mut expected: Vec<String> = steps.iter().map(|s| s.command.clone()).collect();
    expected.push(STATUS_COMMAND.to_string());
    assert_eq!(shell.commands(), expected);
    assert_eq!(report.completed, steps.len());
    assert!(report.status.success());
}

#[tokio::test]
async fn test_first_failure_halts_execution() {
    let steps = plan();
    let shell = RecordingShell::new(vec![
        outcome_ok("Connection established\n"),
        outcome_ok(""),
        outcome_exit(128, "fatal: repository not found"),
    ]);
    let reporter = RecordingReporter::default();

    let failure = run_deploy(&shell, &reporter, &steps, Duration::ZERO)
        .await
        .expect_err("clone step fails");

    assert_eq!(failure.number, 3);
    assert_eq!(failure.label, "Clone repository");
    assert_eq!(failure.command, steps[2].command);
    assert_eq!(failure.reason, "exit code 128");
    assert_eq!(failure.stderr, "fatal: repository not found");

    // Nothing after the failing step, and no status query.
    let commands = shell.commands();
    assert_eq!(commands.len(), 3);
    assert!(!commands.iter().any(|c| c == STATUS_COMMAND));
}

#[tokio::test]
async fn test_reporter_sees_start_then_result_for_each_step() {
    let steps = plan();
    let shell = RecordingShell::new(vec![outcome_ok(""), outcome_exit(1, "")]);
    let reporter = RecordingReporter::default();

    let _ = run_deploy(&shell, &reporter, &steps, Duration::ZERO).await;

    assert_eq!(
        reporter.events(),
        [
            Event::Step("Check connection...".to_string()),
            Event::Success("Check connection - done".to_string()),
            Event::Step("Create application directory...".to_string()),
            Event::Fail("Create application directory failed".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_timeout_is_a_step_failure() {
    let steps = plan();
    let shell = RecordingShell::new(vec![ExecOutcome {
        status: ExecStatus::TimedOut,
        stdout: String::new(),
        stderr: "Timeout".to_string(),
    }]);
    let reporter = RecordingReporter::default();

    let failure = run_deploy(&shell, &reporter, &steps, Duration::ZERO)
        .await
        .expect_err("timeout fails the run");
    assert_eq!(failure.number, 1);
    assert_eq!(failure.reason, "timed out");
    assert_eq!(failure.stderr, "Timeout");
}

#[tokio::test]
async fn test_failed_status_query_is_only_a_warning() {
    let steps = plan();
    let mut outcomes: Vec<ExecOutcome> = steps.iter().map(|_| outcome_ok("")).collect();
    outcomes.push(outcome_exit(1, "pm2: command not found"));
    let shell = RecordingShell::new(outcomes);
    let reporter = RecordingReporter::default();

    let report = run_deploy(&shell, &reporter, &steps, Duration::ZERO)
        .await
        .expect("deploy still succeeds");

    assert!(!report.status.success());
    assert_eq!(
        reporter.events().last(),
        Some(&Event::Warn("status query failed: exit code 1".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_pause_follows_each_successful_step() {
    let steps = plan();
    let shell = RecordingShell::always_ok();
    let reporter = RecordingReporter::default();

    let start = tokio::time::Instant::now();
    run_deploy(&shell, &reporter, &steps, Duration::from_secs(1))
        .await
        .expect("all steps succeed");

    let steps_len = u64::try_from(steps.len()).expect("small");
    assert_eq!(start.elapsed(), Duration::from_secs(steps_len));
}

#[tokio::test(start_paused = true)]
async fn test_no_pause_after_failing_step() {
    let steps = plan();
    let shell = RecordingShell::new(vec![outcome_ok(""), outcome_exit(2, "")]);
    let reporter = RecordingReporter::default();

    let start = tokio::time::Instant::now();
    let _ = run_deploy(&shell, &reporter, &steps, Duration::from_secs(1)).await;

    assert_eq!(start.elapsed(), Duration::from_secs(1));
}
