//! The deploy plan: a fixed, ordered list of labelled remote commands.
//!
//! Pure functions only — commands are built from the target and app
//! settings, nothing is executed here.

use std::borrow::Cow;

use crate::domain::target::Target;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_APP_NAME: &str = "finance-app";
pub const DEFAULT_REPO_URL: &str = "https://github.com/zaharrrov001-hue/finans.git";
pub const DEFAULT_APP_PORT: u16 = 3000;

/// NodeSource setup script for the Node.js major version the app builds with.
pub const NODE_SETUP_URL: &str = "https://deb.nodesource.com/setup_20.x";

/// Issued once after the last step succeeds.
pub const STATUS_COMMAND: &str = "pm2 status";

// ── Types ────────────────────────────────────────────────────────────────────

/// What gets deployed: the PM2 process name, its source, and its HTTP port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    /// Process name passed to `pm2 delete` before the restart. Must match the
    /// `name` declared in the repository's `ecosystem.config.js`, since that
    /// file decides the name `pm2 start` registers.
    pub name: String,
    pub repo_url: String,
    pub port: u16,
}

impl Default for AppSpec {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            repo_url: DEFAULT_REPO_URL.to_string(),
            port: DEFAULT_APP_PORT,
        }
    }
}

/// One remote command and the label shown while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: &'static str,
    pub command: String,
}

impl Step {
    fn new(label: &'static str, command: impl Into<String>) -> Self {
        Self {
            label,
            command: command.into(),
        }
    }
}

// ── Plan ─────────────────────────────────────────────────────────────────────

/// Build the deploy step list, in execution order.
///
/// The clone step deletes the application directory before cloning, so every
/// run starts from a fresh checkout. Steps that install tooling are guarded
/// with `command -v` and are no-ops when the tool is already present.
#[must_use]
pub fn deploy_steps(target: &Target, app: &AppSpec) -> Vec<Step> {
    let app_dir = target.app_dir.trim_end_matches('/');
    let logs_dir = format!("{app_dir}/logs");
    let dir = shell_quote(app_dir);
    let logs = shell_quote(&logs_dir);
    let (parent, leaf) = target.app_dir_parts();
    let (parent, leaf) = (shell_quote(parent), shell_quote(leaf));
    let repo = shell_quote(&app.repo_url);
    let name = shell_quote(&app.name);
    let user = shell_quote(&target.user);
    let home = target.home_dir();
    let home = shell_quote(&home);

    vec![
        Step::new("Check connection", "echo 'Connection established'"),
        Step::new("Create application directory", format!("mkdir -p {dir}")),
        Step::new(
            "Clone repository",
            format!("cd {parent} && rm -rf {leaf} && git clone {repo} {leaf}"),
        ),
        Step::new(
            "Ensure Node.js",
            format!(
                "command -v node >/dev/null 2>&1 || \
                 (curl -fsSL {NODE_SETUP_URL} | bash - && apt-get install -y nodejs)"
            ),
        ),
        Step::new("Install dependencies", format!("cd {dir} && npm install")),
        Step::new("Build application", format!("cd {dir} && npm run build")),
        Step::new(
            "Ensure PM2",
            "command -v pm2 >/dev/null 2>&1 || npm install -g pm2",
        ),
        Step::new("Create log directory", format!("mkdir -p {logs}")),
        Step::new(
            "Stop previous process",
            format!("cd {dir} && pm2 delete {name} 2>/dev/null || true"),
        ),
        Step::new(
            "Start application",
            format!("cd {dir} && pm2 start ecosystem.config.js"),
        ),
        Step::new("Save PM2 process list", "pm2 save"),
        Step::new(
            "Enable PM2 startup",
            format!("pm2 startup systemd -u {user} --hp {home} || true"),
        ),
    ]
}

/// Quote a value for a POSIX shell command line.
///
/// Values made only of path and URL characters are returned as-is; anything
/// else is wrapped in single quotes with embedded `'` written as `'\''`.
#[must_use]
pub fn shell_quote(value: &str) -> Cow<'_, str> {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@%+=,".contains(c));
    if plain {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', "'\\''")))
    }
}

/// URL the application answers on once PM2 has started it.
#[must_use]
pub fn app_url(target: &Target, app: &AppSpec) -> String {
    format!("http://{}:{}", target.host, app.port)
}
