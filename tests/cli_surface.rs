//! Binary surface tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn help_lists_commands() {
    Command::cargo_bin("corechat")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("telemetry"));
}

#[test]
fn version_prints() {
    Command::cargo_bin("corechat")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("corechat"));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("corechat")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}

#[test]
fn history_list_on_fresh_store_reports_empty() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("corechat")
        .unwrap()
        .env(
            "CORECHAT_SESSIONS_DB",
            dir.path().join("sessions.db").to_string_lossy().to_string(),
        )
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No stored sessions"));
}

#[test]
fn telemetry_topics_lists_subsystems() {
    Command::cargo_bin("corechat")
        .unwrap()
        .args(["telemetry", "topics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("emotion-engine"));
}
