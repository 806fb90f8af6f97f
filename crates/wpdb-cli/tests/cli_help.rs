use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("wpdb")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("attach"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("snapshot"))
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--mode"));
}

#[test]
fn test_send_requires_a_command() {
    cargo_bin_cmd!("wpdb")
        .arg("send")
        .assert()
        .failure()
        .stderr(predicate::str::contains("COMMAND"));
}

#[test]
fn test_rejects_unknown_mode() {
    cargo_bin_cmd!("wpdb")
        .args(["--mode", "carrier-pigeon", "snapshot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("carrier-pigeon"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("wpdb")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}
