//! Remote login command construction.
//!
//! Builds the local process invocation that opens an ssh session to the
//! target, answers the password prompt through a helper program, and runs a
//! single remote command. Pure functions only — nothing is spawned here.

use std::fmt;
use std::time::Duration;

use crate::domain::target::Target;

/// Exit code reported by the expect script when the remote side never
/// finishes within the timeout. Matches coreutils `timeout(1)`.
pub const EXPECT_TIMEOUT_EXIT: i32 = 124;

/// Exit code reported by the expect script when the password is rejected.
/// Matches what ssh itself returns on authentication failure.
pub const AUTH_REJECTED_EXIT: i32 = 255;

const SSH_OPTIONS: [&str; 4] = [
    "-o",
    "StrictHostKeyChecking=no",
    "-o",
    "UserKnownHostsFile=/dev/null",
];

// ── Helper ───────────────────────────────────────────────────────────────────

/// Local program that answers the ssh password prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordHelper {
    /// `expect` with an inline Tcl script (the password is inside the script).
    #[default]
    Expect,
    /// `sshpass -e` (the password travels in the `SSHPASS` environment variable).
    Sshpass,
}

impl PasswordHelper {
    pub const ALL: [&'static str; 2] = ["expect", "sshpass"];

    /// Name of the executable looked up on `PATH`.
    #[must_use]
    pub fn program(self) -> &'static str {
        match self {
            Self::Expect => "expect",
            Self::Sshpass => "sshpass",
        }
    }

    /// Short installation hint shown when the helper is missing.
    #[must_use]
    pub fn install_hint(self) -> &'static str {
        match self {
            Self::Expect => "Install it with: brew install expect  (or: apt-get install expect)",
            Self::Sshpass => "Install it with: apt-get install sshpass  (or: brew install sshpass)",
        }
    }

    /// Parse a helper name as written in config files and on the command line.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "expect" => Some(Self::Expect),
            "sshpass" => Some(Self::Sshpass),
            _ => None,
        }
    }
}

impl fmt::Display for PasswordHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

// ── Invocation ───────────────────────────────────────────────────────────────

/// A fully-specified local process: program, argv, and extra environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
    pub env: Vec<(&'static str, String)>,
}

// Environment values may hold the password; only their names are shown.
impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env_names: Vec<_> = self.env.iter().map(|(k, _)| *k).collect();
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args.len())
            .field("env", &env_names)
            .finish()
    }
}

/// Arguments for `ssh`, excluding the program name.
#[must_use]
pub fn ssh_args(target: &Target, command: &str) -> Vec<String> {
    let mut args: Vec<String> = SSH_OPTIONS.iter().map(|s| (*s).to_string()).collect();
    args.push(target.destination());
    args.push(command.to_string());
    args
}

/// Build the local invocation that runs `command` on the target.
#[must_use]
pub fn remote_invocation(
    helper: PasswordHelper,
    target: &Target,
    command: &str,
    timeout: Duration,
) -> Invocation {
    match helper {
        PasswordHelper::Expect => Invocation {
            program: "expect",
            args: vec!["-c".to_string(), expect_script(target, command, timeout)],
            env: Vec::new(),
        },
        PasswordHelper::Sshpass => {
            let mut args = vec!["-e".to_string(), "ssh".to_string()];
            args.extend(ssh_args(target, command));
            Invocation {
                program: "sshpass",
                args,
                env: vec![("SSHPASS", target.password.clone())],
            }
        }
    }
}

/// Tcl script for `expect -c` that logs in and runs `command`.
///
/// The script exits with the remote command's exit status, with
/// [`AUTH_REJECTED_EXIT`] when the password prompt reappears, and with
/// [`EXPECT_TIMEOUT_EXIT`] when either wait exceeds `timeout`.
#[must_use]
pub fn expect_script(target: &Target, command: &str, timeout: Duration) -> String {
    let spawn_words: Vec<String> = std::iter::once("ssh".to_string())
        .chain(ssh_args(target, command))
        .map(|w| tcl_word(&w))
        .collect();

    format!(
        r#"set timeout {secs}
log_user 1
spawn -noecho {spawn}
set authenticated 0
expect {{
    -nocase "password:" {{ send -- "{password}\r"; set authenticated 1 }}
    timeout {{ send_error "Timeout\n"; exit {timeout_exit} }}
    eof
}}
if {{$authenticated}} {{
    expect {{
        -nocase "password:" {{ send_error "password rejected\n"; exit {auth_exit} }}
        timeout {{ send_error "Timeout\n"; exit {timeout_exit} }}
        eof
    }}
}}
catch wait result
exit [lindex $result 3]
"#,
        secs = timeout.as_secs().max(1),
        spawn = spawn_words.join(" "),
        password = tcl_escape(&target.password),
        timeout_exit = EXPECT_TIMEOUT_EXIT,
        auth_exit = AUTH_REJECTED_EXIT,
    )
}

// ── Tcl quoting ──────────────────────────────────────────────────────────────

/// Backslash-escape every character Tcl would otherwise interpret.
///
/// The result is valid both as a bare word and inside double quotes.
#[must_use]
pub fn tcl_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' ' | ';' | '$' | '[' | ']' | '{' | '}' | '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Quote `s` as exactly one Tcl word.
#[must_use]
pub fn tcl_word(s: &str) -> String {
    if s.is_empty() {
        "\"\"".to_string()
    } else {
        tcl_escape(s)
    }
}
