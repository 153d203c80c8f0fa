//! Application context — unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()`: it loads the optional config
//! file, layers command-line overrides on top, validates the result, and
//! holds the output context alongside the resolved run settings.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::application::services::remote_exec::RemoteExecutor;
use crate::domain::{DeployConfig, RunSettings};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Per-run overrides taken from flags and environment variables.
///
/// `None` keeps whatever the config file (or the compiled-in default) says.
#[derive(Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub app_dir: Option<String>,
    pub helper: Option<String>,
    pub timeout_secs: Option<u64>,
    pub pause_ms: Option<u64>,
}

impl Overrides {
    /// Apply every set override to `config`.
    pub fn apply(self, config: &mut DeployConfig) {
        let Overrides {
            host,
            user,
            password,
            app_dir,
            helper,
            timeout_secs,
            pause_ms,
        } = self;
        if let Some(v) = host {
            config.target.host = v;
        }
        if let Some(v) = user {
            config.target.user = v;
        }
        if let Some(v) = password {
            config.target.password = v;
        }
        if let Some(v) = app_dir {
            config.target.app_dir = v;
        }
        if let Some(v) = helper {
            config.run.helper = v;
        }
        if let Some(v) = timeout_secs {
            config.run.timeout_secs = v;
        }
        if let Some(v) = pause_ms {
            config.run.pause_ms = v;
        }
    }
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Explicit config file, if any.
    pub config: Option<PathBuf>,
    /// Target and run overrides.
    pub overrides: Overrides,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Validated target, app, and run settings.
    pub settings: RunSettings,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the merged
    /// settings are invalid.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let store = YamlConfigStore::new(flags.config);
        let config = store.load().context("cannot load configuration")?;
        let settings = resolve_settings(config, flags.overrides)?;
        tracing::debug!(
            host = %settings.target.host,
            helper = %settings.helper,
            "resolved settings"
        );

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            settings,
        })
    }

    /// Executor bound to the resolved target, backed by real processes.
    #[must_use]
    pub fn executor(&self) -> RemoteExecutor<TokioCommandRunner> {
        RemoteExecutor::new(
            TokioCommandRunner,
            self.settings.target.clone(),
            self.settings.helper,
            self.settings.timeout,
        )
    }

    /// Pause between successful steps.
    #[must_use]
    pub fn pause(&self) -> Duration {
        self.settings.pause
    }
}

/// Merge overrides into a loaded config and validate the result.
///
/// # Errors
///
/// Returns an error if the merged config fails validation.
pub fn resolve_settings(mut config: DeployConfig, overrides: Overrides) -> Result<RunSettings> {
    overrides.apply(&mut config);
    config.resolve().context("invalid configuration")
}
