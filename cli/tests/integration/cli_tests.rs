//! Integration tests for the appdeploy binary: argument parsing, the plan
//! listing, and failure handling when no password helper is installed.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with colors off and an isolated, empty home directory so a real
/// `~/.appdeploy/config.yaml` never leaks into the test.
fn appdeploy(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("appdeploy"));
    cmd.env("NO_COLOR", "1")
        .env("HOME", home.path())
        .env_remove("APPDEPLOY_CONFIG")
        .env_remove("APPDEPLOY_HOST")
        .env_remove("APPDEPLOY_USER")
        .env_remove("APPDEPLOY_PASSWORD");
    cmd
}

fn home() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

// --- Help and version ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    let home = home();
    appdeploy(&home)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Deploy a Node.js web app"));
}

#[test]
fn test_help_lists_commands() {
    let home = home();
    appdeploy(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_help_never_shows_password_from_env() {
    let home = home();
    appdeploy(&home)
        .env("APPDEPLOY_PASSWORD", "hunter2-from-env")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2-from-env").not());
}

#[test]
fn test_version_command_shows_version() {
    let home = home();
    appdeploy(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "appdeploy {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_ignores_broken_config() {
    let home = home();
    appdeploy(&home)
        .args(["--config", "/nonexistent/appdeploy.yaml", "version"])
        .assert()
        .success();
}

// --- plan ---

#[test]
fn test_plan_lists_steps_in_order() {
    let home = home();
    let output = appdeploy(&home)
        .arg("plan")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf-8");

    let clone = text.find("Clone repository").expect("clone step listed");
    let build = text.find("Build application").expect("build step listed");
    let start = text.find("Start application").expect("start step listed");
    let status = text.find("pm2 status").expect("status query listed");
    assert!(clone < build && build < start && start < status, "got:\n{text}");
    assert!(text.contains("http://203.0.113.10:3000"), "got:\n{text}");
}

#[test]
fn test_plan_applies_flag_overrides() {
    let home = home();
    appdeploy(&home)
        .args(["plan", "--host", "deploy.example.org", "--user", "web", "--app-dir", "/srv/shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web@deploy.example.org"))
        .stdout(predicate::str::contains("cd /srv && rm -rf shop"))
        .stdout(predicate::str::contains("pm2 startup systemd -u web --hp /home/web"));
}

#[test]
fn test_plan_reads_config_file() {
    let home = home();
    let cfg = home.path().join("deploy.yaml");
    std::fs::write(&cfg, "target:\n  host: 192.0.2.50\napp:\n  port: 8080\n").expect("write");
    appdeploy(&home)
        .arg("plan")
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("http://192.0.2.50:8080"));
}

#[test]
fn test_plan_reads_default_config_under_home() {
    let home = home();
    let dir = home.path().join(".appdeploy");
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join("config.yaml"), "target:\n  host: 192.0.2.77\n").expect("write");
    appdeploy(&home)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("root@192.0.2.77"));
}

#[test]
fn test_plan_never_prints_password() {
    let home = home();
    appdeploy(&home)
        .args(["plan", "--password", "pl4n-s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pl4n-s3cret").not());
}

// --- configuration errors ---

#[test]
fn test_unknown_helper_rejected_by_parser() {
    let home = home();
    appdeploy(&home)
        .args(["plan", "--helper", "plink"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("plink"));
}

#[test]
fn test_missing_explicit_config_exits_one() {
    let home = home();
    appdeploy(&home)
        .args(["plan", "--config", "/nonexistent/appdeploy.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_relative_app_dir_exits_one() {
    let home = home();
    appdeploy(&home)
        .args(["plan", "--app-dir", "finance-app"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absolute"));
}

#[test]
fn test_app_dir_with_parent_component_exits_one() {
    let home = home();
    appdeploy(&home)
        .args(["plan", "--app-dir", "/root/../etc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("target.app_dir"))
        .stdout(predicate::str::contains("rm -rf").not());
}

// --- deploy without a password helper ---

#[test]
fn test_deploy_without_helper_fails_on_first_step() {
    let home = home();
    let empty_path = tempfile::tempdir().expect("tempdir");
    appdeploy(&home)
        .env("PATH", empty_path.path())
        .args(["deploy", "--pause-ms", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Step 1 failed: Check connection"))
        .stderr(predicate::str::contains("expect not found"))
        .stderr(predicate::str::contains("brew install expect"))
        .stdout(predicate::str::contains("Clone repository").not());
}

#[test]
fn test_status_without_helper_exits_one() {
    let home = home();
    let empty_path = tempfile::tempdir().expect("tempdir");
    appdeploy(&home)
        .env("PATH", empty_path.path())
        .args(["status", "--helper", "sshpass"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sshpass not found"));
}
