//! Binary-level tests of argument handling and configuration errors.

use assert_cmd::Command;
use predicates::prelude::*;

fn teosctl() -> Command {
    Command::cargo_bin("teosctl").expect("teosctl binary")
}

#[test]
fn test_help_lists_command_groups() {
    teosctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("wallet"))
        .stdout(predicate::str::contains("bootstrap"));
}

#[test]
fn test_missing_config_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    teosctl()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn test_malformed_config_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.json");
    std::fs::write(&config, "{\"version\": ").expect("write config");
    teosctl()
        .arg("--config")
        .arg(&config)
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn test_config_without_executable_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        r#"{"version": "1.0", "node_block_count": 5, "node_block_num": 3}"#,
    )
    .expect("write config");
    teosctl()
        .env("TEOS_CONFIG", &config)
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("teos_executable"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    teosctl()
        .args(["wallet", "destroy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
