//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

fn coach_bin() -> Command {
    Command::cargo_bin("interview-coach").unwrap()
}

#[test]
fn help_output() {
    coach_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--server-url"))
        .stdout(predicate::str::contains("--question"))
        .stdout(predicate::str::contains("--overlay"))
        .stdout(predicate::str::contains("questions"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    coach_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("interview-coach"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn explicit_question_conflicts_with_index() {
    coach_bin()
        .args(["-q", "text", "-i", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn questions_fall_back_to_built_in_list_offline() {
    // Nothing listens on this port, so the fetch fails and the built-in
    // list is printed instead
    let dir = tempfile::tempdir().unwrap();
    coach_bin()
        .arg("questions")
        .args(["--server-url", "http://127.0.0.1:1"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tell me about yourself."))
        .stdout(predicate::str::contains("Why do you want this job?"))
        .stderr(predicate::str::contains("built-in"));
}

#[test]
fn config_get_unknown_key() {
    coach_bin()
        .args(["config", "get", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_unknown_key() {
    coach_bin()
        .args(["config", "set", "unknown_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Valid keys"));
}

#[test]
fn config_set_invalid_server_url() {
    let dir = tempfile::tempdir().unwrap();
    coach_bin()
        .args(["config", "set", "server_url", "not a url"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("server_url"));
}

#[test]
fn config_set_invalid_fragment_interval() {
    let dir = tempfile::tempdir().unwrap();
    coach_bin()
        .args(["config", "set", "fragment_millis", "abc"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("milliseconds"));
}

#[test]
fn config_set_then_get_round_trips() {
    let dir = tempfile::tempdir().unwrap();

    coach_bin()
        .args(["config", "set", "server_url", "http://coach.local:8000"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .success();

    coach_bin()
        .args(["config", "get", "server_url"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("http://coach.local:8000"));
}

#[test]
fn config_list_with_no_file() {
    let dir = tempfile::tempdir().unwrap();
    coach_bin()
        .args(["config", "list"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("server_url"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn config_init_then_init_again_fails() {
    let dir = tempfile::tempdir().unwrap();

    coach_bin()
        .args(["config", "init"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .success();

    coach_bin()
        .args(["config", "init"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_path_prints_a_path() {
    let dir = tempfile::tempdir().unwrap();
    coach_bin()
        .args(["config", "path"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
