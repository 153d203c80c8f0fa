//! `appdeploy plan` — list the deploy steps without connecting.

use std::process::ExitCode;

use crate::app::AppContext;
use crate::domain::{STATUS_COMMAND, app_url, deploy_steps};

/// Run `appdeploy plan`. The password is never printed.
#[must_use]
pub fn run(app: &AppContext) -> ExitCode {
    let ctx = &app.output;
    let settings = &app.settings;

    ctx.header(&format!("Deploy plan for {}", settings.app.name));
    ctx.kv("target ", &settings.target.destination());
    ctx.kv("app dir", &settings.target.app_dir);
    ctx.kv("helper ", settings.helper.program());
    ctx.kv("timeout", &format!("{}s per step", settings.timeout.as_secs()));
    if !ctx.quiet {
        println!();
    }

    let steps = deploy_steps(&settings.target, &settings.app);
    for (i, step) in steps.iter().enumerate() {
        ctx.numbered(i + 1, step.label, &step.command);
    }
    ctx.numbered(steps.len() + 1, "Query status", STATUS_COMMAND);

    if !ctx.quiet {
        println!();
    }
    ctx.kv("url", &app_url(&settings.target, &settings.app));
    ExitCode::SUCCESS
}
