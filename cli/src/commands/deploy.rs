//! `appdeploy deploy` — run every deploy step on the target, in order.

use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::services::deploy::{DeployReport, run_deploy};
use crate::domain::{PasswordHelper, RunSettings, StepFailure, app_url, deploy_steps};
use crate::output::{OutputContext, TerminalReporter};

/// Run `appdeploy deploy`.
///
/// Returns exit code 1 when a step fails; the failing step's diagnostics are
/// printed first and no later step runs.
pub async fn run(app: &AppContext) -> ExitCode {
    let ctx = &app.output;
    let settings = &app.settings;

    ctx.header(&format!(
        "Deploying {} to {}",
        settings.app.name,
        settings.target.destination()
    ));

    let executor = app.executor();
    let reporter = TerminalReporter::new(ctx);
    let steps = deploy_steps(&settings.target, &settings.app);

    match run_deploy(&executor, &reporter, &steps, app.pause()).await {
        Ok(report) => {
            print_summary(ctx, settings, &report);
            ExitCode::SUCCESS
        }
        Err(failure) => {
            print_failure(ctx, settings.helper, &failure);
            ExitCode::FAILURE
        }
    }
}

fn print_summary(ctx: &OutputContext, settings: &RunSettings, report: &DeployReport) {
    if !ctx.quiet {
        println!();
    }
    ctx.header("Application status:");
    ctx.block(&report.status.stdout);
    if !ctx.quiet {
        println!();
    }
    ctx.success(&format!("Deploy complete ({} steps)", report.completed));
    ctx.kv("url", &app_url(&settings.target, &settings.app));
    ctx.info(&format!(
        "Configure a reverse proxy (e.g. Nginx) to forward to localhost:{}",
        settings.app.port
    ));
}

fn print_failure(ctx: &OutputContext, helper: PasswordHelper, failure: &StepFailure) {
    ctx.error(&format!(
        "Step {} failed: {} ({})",
        failure.number, failure.label, failure.reason
    ));
    ctx.error(&format!("Command: {}", failure.command));
    let stderr = failure.stderr.trim();
    if !stderr.is_empty() {
        ctx.error(&format!("Error: {stderr}"));
    }
    if failure.missing_helper.is_some() {
        ctx.error(&format!("'{helper}' is required. {}", helper.install_hint()));
    }
}
