//! The deployment target: one host, one account, one application directory.
//!
//! Pure data — no I/O.

// ── Compiled-in target ───────────────────────────────────────────────────────

/// Default server address.
pub const DEFAULT_HOST: &str = "203.0.113.10";
/// Default login user.
pub const DEFAULT_USER: &str = "root";
/// Default login password, answered to the ssh prompt by the password helper.
pub const DEFAULT_PASSWORD: &str = "changeme";
/// Default application directory on the remote host.
pub const DEFAULT_APP_DIR: &str = "/root/finance-app";

/// Remote host and credentials, fixed for the duration of a run.
#[derive(Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub user: String,
    pub password: String,
    pub app_dir: String,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            app_dir: DEFAULT_APP_DIR.to_string(),
        }
    }
}

// Hand-written so the password never ends up in logs or panic messages.
impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("app_dir", &self.app_dir)
            .finish()
    }
}

impl Target {
    /// `user@host`, as passed to ssh.
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// Home directory of the login user on the remote host.
    #[must_use]
    pub fn home_dir(&self) -> String {
        if self.user == "root" {
            "/root".to_string()
        } else {
            format!("/home/{}", self.user)
        }
    }

    /// Splits `app_dir` into its parent directory and final component.
    ///
    /// `/root/finance-app` becomes `("/root", "finance-app")`. A directory
    /// directly under `/` has parent `/`.
    #[must_use]
    pub fn app_dir_parts(&self) -> (&str, &str) {
        let trimmed = self.app_dir.trim_end_matches('/');
        match trimmed.rsplit_once('/') {
            Some(("", leaf)) => ("/", leaf),
            Some((parent, leaf)) => (parent, leaf),
            None => (".", trimmed),
        }
    }
}
