//! Domain layer — pure deployment logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod login;
pub mod plan;
pub mod target;

pub use config::{DeployConfig, RunSettings};
pub use error::{ConfigError, RunError, StepFailure};
pub use login::{Invocation, PasswordHelper};
pub use plan::{AppSpec, STATUS_COMMAND, Step, app_url, deploy_steps};
pub use target::Target;
