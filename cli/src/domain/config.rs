//! Domain types and validators for appdeploy configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::login::PasswordHelper;
use crate::domain::plan::{AppSpec, DEFAULT_APP_NAME, DEFAULT_APP_PORT, DEFAULT_REPO_URL};
use crate::domain::target::{
    DEFAULT_APP_DIR, DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_USER, Target,
};

// ── Constants ────────────────────────────────────────────────────────────────

/// Upper bound for a single remote command, including the ssh login.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// Pause between consecutive successful steps.
pub const DEFAULT_PAUSE_MS: u64 = 1000;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, optionally read from `~/.appdeploy/config.yaml`.
///
/// Every field falls back to the compiled-in value when absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DeployConfig {
    pub target: TargetConfig,
    pub app: AppConfig,
    pub run: RunConfig,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TargetConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub app_dir: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            app_dir: DEFAULT_APP_DIR.to_string(),
        }
    }
}

impl std::fmt::Debug for TargetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("app_dir", &self.app_dir)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// PM2 process name; must match the name in the app's `ecosystem.config.js`.
    pub name: String,
    pub repo_url: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            repo_url: DEFAULT_REPO_URL.to_string(),
            port: DEFAULT_APP_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    /// `expect` (default) or `sshpass`.
    pub helper: String,
    pub timeout_secs: u64,
    pub pause_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            helper: PasswordHelper::Expect.program().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

// ── Resolved settings ────────────────────────────────────────────────────────

/// Validated, typed settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub target: Target,
    pub app: AppSpec,
    pub helper: PasswordHelper,
    pub timeout: Duration,
    pub pause: Duration,
}

impl DeployConfig {
    /// Validate the config and convert it to typed run settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any value is empty, out of range, or
    /// names an unknown helper.
    pub fn resolve(&self) -> Result<RunSettings> {
        validate_non_empty("target.host", &self.target.host)?;
        validate_non_empty("target.user", &self.target.user)?;
        validate_non_empty("app.name", &self.app.name)?;
        validate_non_empty("app.repo_url", &self.app.repo_url)?;
        validate_app_dir(&self.target.app_dir)?;
        let helper = parse_helper(&self.run.helper)?;
        if self.run.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout.into());
        }

        Ok(RunSettings {
            target: Target {
                host: self.target.host.clone(),
                user: self.target.user.clone(),
                password: self.target.password.clone(),
                app_dir: self.target.app_dir.clone(),
            },
            app: AppSpec {
                name: self.app.name.clone(),
                repo_url: self.app.repo_url.clone(),
                port: self.app.port,
            },
            helper,
            timeout: Duration::from_secs(self.run.timeout_secs),
            pause: Duration::from_millis(self.run.pause_ms),
        })
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

fn validate_non_empty(key: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { key }.into());
    }
    Ok(())
}

/// Validates the remote application directory.
///
/// # Errors
///
/// Returns an error if the path is not absolute, is the filesystem root,
/// contains a `.` or `..` component, or contains whitespace or control
/// characters.
pub fn validate_app_dir(dir: &str) -> Result<()> {
    if !dir.starts_with('/') {
        return Err(ConfigError::RelativeAppDir(dir.to_string()).into());
    }
    let invalid = || ConfigError::InvalidValue {
        key: "target.app_dir",
        value: dir.to_string(),
        valid: "an absolute directory below / without '.', '..', whitespace or control characters"
            .to_string(),
    };
    if dir.trim_end_matches('/').is_empty() {
        return Err(invalid().into());
    }
    if dir.split('/').any(|part| part == "." || part == "..") {
        return Err(invalid().into());
    }
    if dir.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid().into());
    }
    Ok(())
}

/// Parses a password helper name.
///
/// # Errors
///
/// Returns an error listing the valid helpers if `name` is unknown.
pub fn parse_helper(name: &str) -> Result<PasswordHelper> {
    PasswordHelper::from_name(name).ok_or_else(|| {
        ConfigError::InvalidValue {
            key: "run.helper",
            value: name.to_string(),
            valid: PasswordHelper::ALL.join(", "),
        }
        .into()
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
