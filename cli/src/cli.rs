//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags, Overrides};
use crate::commands;

/// Deploy a Node.js web app to a single server over SSH
#[derive(Parser)]
#[command(
    name = "appdeploy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Target and run overrides. Unset values come from the config file.
#[derive(Args, Default)]
pub struct TargetArgs {
    /// Config file [default: ~/.appdeploy/config.yaml]
    #[arg(long, global = true, env = "APPDEPLOY_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Server address
    #[arg(long, global = true, env = "APPDEPLOY_HOST")]
    pub host: Option<String>,

    /// Login user
    #[arg(long, global = true, env = "APPDEPLOY_USER")]
    pub user: Option<String>,

    /// Login password
    #[arg(long, global = true, env = "APPDEPLOY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Application directory on the server
    #[arg(long, global = true, value_name = "DIR")]
    pub app_dir: Option<String>,

    /// Program that answers the password prompt
    #[arg(long, global = true, value_parser = ["expect", "sshpass"])]
    pub helper: Option<String>,

    /// Per-command timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Pause between steps in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub pause_ms: Option<u64>,
}

impl TargetArgs {
    /// Split into the explicit config path and the value overrides.
    #[must_use]
    pub fn into_parts(self) -> (Option<PathBuf>, Overrides) {
        let TargetArgs {
            config,
            host,
            user,
            password,
            app_dir,
            helper,
            timeout,
            pause_ms,
        } = self;
        (
            config,
            Overrides {
                host,
                user,
                password,
                app_dir,
                helper,
                timeout_secs: timeout,
                pause_ms,
            },
        )
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Clone, build, and start the app on the server
    Deploy,

    /// List the deploy steps without connecting
    Plan,

    /// Show the process manager status on the server
    Status,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command
    /// fails outside of a deploy step.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            quiet,
            no_color,
            target,
            command,
        } = self;

        let build = move || {
            let (config, overrides) = target.into_parts();
            AppContext::new(AppFlags {
                output: OutputFlags { no_color, quiet },
                config,
                overrides,
            })
        };

        match command {
            Command::Deploy => Ok(commands::deploy::run(&build()?).await),
            Command::Plan => Ok(commands::plan::run(&build()?)),
            Command::Status => Ok(commands::status::run(&build()?).await),
            Command::Version => {
                commands::version::run();
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
