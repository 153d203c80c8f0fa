//! `appdeploy status` — show the process manager's process table.

use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::services::deploy::query_status;

/// Run `appdeploy status`. Exits 1 when the query fails.
pub async fn run(app: &AppContext) -> ExitCode {
    let ctx = &app.output;
    let executor = app.executor();

    let outcome = query_status(&executor).await;
    ctx.block(&outcome.stdout);

    if outcome.success() {
        ExitCode::SUCCESS
    } else {
        ctx.error(&format!("status query failed: {}", outcome.status));
        let stderr = outcome.stderr.trim();
        if !stderr.is_empty() {
            ctx.error(&format!("Error: {stderr}"));
        }
        ExitCode::FAILURE
    }
}
