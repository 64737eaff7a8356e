//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd

mod common;

use common::engine_cmd;
use predicates::prelude::*;

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    engine_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ops Heaven Engine"))
        .stdout(predicate::str::contains("menu"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("alerts"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command() {
    engine_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ops-heaven"))
        .stdout(predicate::str::contains("Build Information"))
        .stdout(predicate::str::contains("Git Hash"))
        .stdout(predicate::str::contains("Target"));
}

#[test]
fn test_short_version_flag() {
    engine_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ops-heaven"));
}

#[test]
fn test_unknown_subcommand_fails() {
    engine_cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand").or(predicate::str::contains("error")));
}

// ─────────────────────────────────────────────────────────────────
// Menu Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_menu_employee() {
    engine_cmd()
        .args(["menu", "--role", "employee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("profile"))
        .stdout(predicate::str::contains("meetings"))
        .stdout(predicate::str::contains("team").not());
}

#[test]
fn test_menu_manager() {
    engine_cmd()
        .args(["menu", "--role", "manager"])
        .assert()
        .success()
        .stdout(predicate::str::contains("team"))
        .stdout(predicate::str::contains("add-employee"))
        .stdout(predicate::str::contains("user-management").not());
}

#[test]
fn test_menu_admin_order() {
    let output = engine_cmd()
        .args(["menu", "--role", "admin"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let sections: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        sections,
        vec![
            "dashboard",
            "profile",
            "meetings",
            "team",
            "add-employee",
            "user-management",
            "settings",
        ]
    );
}

#[test]
fn test_menu_is_stable() {
    let first = engine_cmd()
        .args(["menu", "--role", "super-admin"])
        .output()
        .unwrap();
    let second = engine_cmd()
        .args(["menu", "--role", "super-admin"])
        .output()
        .unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_menu_json() {
    engine_cmd()
        .args(["--json", "menu", "--role", "manager"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"add-employee\""));
}

#[test]
fn test_menu_unknown_role_is_fatal() {
    engine_cmd()
        .args(["menu", "--role", "wizard"])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("Unknown role"))
        .stderr(predicate::str::contains("wizard"));
}

#[test]
fn test_menu_does_not_default_unknown_role_to_employee() {
    let output = engine_cmd()
        .args(["menu", "--role", "wizard"])
        .output()
        .unwrap();
    // No menu is printed at all: an unknown role never falls back to
    // the employee menu
    assert!(output.stdout.is_empty());
}

// ─────────────────────────────────────────────────────────────────
// Snapshot Handling Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_missing_snapshot_file_fails() {
    engine_cmd()
        .args(["--data", "/nonexistent/data.json", "alerts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_trend_does_not_need_a_snapshot() {
    engine_cmd()
        .args(["report", "trend", "--scores", "75,79,82,85"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+3.0"));
}
