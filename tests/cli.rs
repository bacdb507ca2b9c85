//! CLI integration tests.
//!
//! Each test points the binary at an unreachable service and an isolated
//! home directory, so no test touches real credentials or the network.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const UNREACHABLE: &str = "http://127.0.0.1:1";

struct TestContext {
    home: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            home: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn bare_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("flowshelf").expect("failed to find binary");
        cmd.env("NO_COLOR", "1")
            .env("FLOWSHELF_HOME", self.home.path())
            .env("ADMIN_EMAIL", "owner@example.com")
            .env_remove("FLOWSHELF_CONFIG")
            .env_remove("FLOWSHELF_URL")
            .env_remove("FLOWSHELF_API_KEY")
            .env_remove("RUST_LOG");
        cmd
    }

    fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.env("FLOWSHELF_URL", UNREACHABLE);
        cmd
    }

    fn write_session(&self, service_url: &str) {
        fs::write(
            self.home.path().join("session.toml"),
            format!("[default]\nservice_url = \"{service_url}\"\naccess_token = \"tok\"\n"),
        )
        .unwrap();
    }
}

#[test]
fn test_help_lists_commands() {
    let ctx = TestContext::new();
    ctx.bare_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("entry"));
}

#[test]
fn test_missing_service_url_is_config_error() {
    let ctx = TestContext::new();
    ctx.bare_cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("service_url is not set"));
}

#[test]
fn test_list_reports_load_failure_and_shows_empty_state() {
    let ctx = TestContext::new();
    ctx.cmd()
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to load workflows"))
        .stdout(predicate::str::contains("No workflows found."));
}

#[test]
fn test_list_json_is_empty_array_when_unreachable() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["list", "--json", "--search", "slack"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_config_file_supplies_service_url() {
    let ctx = TestContext::new();
    let config = ctx.home.path().join("flowshelf.toml");
    fs::write(&config, format!("service_url = \"{UNREACHABLE}\"\n")).unwrap();

    ctx.bare_cmd()
        .args(["--config", config.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No workflows found."));
}

#[test]
fn test_unreadable_config_file_fails() {
    let ctx = TestContext::new();
    let missing = ctx.home.path().join("missing.toml");

    ctx.bare_cmd()
        .args(["--config", missing.to_str().unwrap(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_default_admin_warning() {
    let ctx = TestContext::new();
    ctx.cmd()
        .env_remove("ADMIN_EMAIL")
        .args(["auth", "status"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ADMIN_EMAIL is not configured"));
}

#[test]
fn test_status_without_session() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_session_for_other_service_is_ignored() {
    let ctx = TestContext::new();
    ctx.write_session("https://other.example.com");

    ctx.cmd()
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_logout_removes_saved_session() {
    let ctx = TestContext::new();
    ctx.write_session(UNREACHABLE);

    ctx.cmd()
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out successfully."));
    assert!(!ctx.home.path().join("session.toml").exists());

    ctx.cmd()
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No credentials found."));
}

#[test]
fn test_login_non_interactive_requires_callback() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["auth", "login", "--non-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--callback is required"));
}

#[test]
fn test_entry_commands_require_login() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["entry", "delete", "wf-1", "--non-interactive", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    ctx.cmd()
        .args(["entry", "add", "--non-interactive", "--title", "T"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}
