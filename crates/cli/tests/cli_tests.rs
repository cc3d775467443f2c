//! CLI integration tests
//!
//! These run without a content store: they cover argument validation and
//! startup configuration failures, which all happen before any network
//! traffic.
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut command = assert_cmd::Command::cargo_bin("retexo").unwrap();
    command
        .env_remove("RETEXO_STORE_URL")
        .env_remove("RETEXO_STORE_USERNAME")
        .env_remove("RETEXO_STORE_APP_PASSWORD");
    command
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--copy-mode"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_cli_version() {
    cmd().arg("--version").assert().success();
}

#[test]
fn test_cli_requires_url_or_file() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url or --file"));
}

#[test]
fn test_cli_rejects_url_with_file() {
    cmd()
        .args(["--url", "https://t/1", "--file", "jobs.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be combined"));
}

#[test]
fn test_cli_copy_mode_requires_source_url() {
    cmd()
        .args(["--url", "https://t/1", "--copy-mode"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--source-url"));
}

#[test]
fn test_cli_source_url_requires_copy_mode() {
    cmd()
        .args(["--url", "https://t/1", "--source-url", "https://s/1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--copy-mode"));
}

#[test]
fn test_cli_missing_store_config_is_fatal() {
    cmd()
        .args(["--url", "https://t/1", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RETEXO_STORE_URL"));
}

#[test]
fn test_cli_missing_config_names_every_variable() {
    cmd()
        .args(["--url", "https://t/1"])
        .env("RETEXO_STORE_URL", "https://store.example.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains("RETEXO_STORE_USERNAME"))
        .stderr(predicate::str::contains("RETEXO_STORE_APP_PASSWORD"))
        .stderr(predicate::str::contains("RETEXO_STORE_URL").not());
}

#[test]
fn test_cli_unreachable_store_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let jobs = tmp.path().join("jobs.txt");
    std::fs::write(&jobs, "https://t/1\n").unwrap();

    cmd()
        .args(["--file", jobs.to_str().unwrap()])
        .env("RETEXO_STORE_URL", "http://127.0.0.1:1")
        .env("RETEXO_STORE_USERNAME", "user")
        .env("RETEXO_STORE_APP_PASSWORD", "pass")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot connect"));
}
