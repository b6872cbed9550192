//! CLI integration tests

use std::process::Command;

use predicates::prelude::*;

fn scribe_booth_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_scribe-booth"))
}

#[test]
fn help_output() {
    assert_cmd::Command::cargo_bin("scribe-booth")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transcription"))
        .stdout(predicate::str::contains("--device"))
        .stdout(predicate::str::contains("--title"))
        .stdout(predicate::str::contains("--notify"))
        .stdout(predicate::str::contains("--server"))
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("profiles"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    assert_cmd::Command::cargo_bin("scribe-booth")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scribe-booth"));
}

#[test]
fn config_help() {
    let output = scribe_booth_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn config_path_command() {
    let output = scribe_booth_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("scribe-booth"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_get_unknown_key() {
    let output = scribe_booth_bin()
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let output = scribe_booth_bin()
        .args(["config", "set", "unknown_key", "value"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_set_invalid_notify_value() {
    let output = scribe_booth_bin()
        .args(["config", "set", "notify", "maybe"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("true") || stderr.contains("false"),
        "Expected error about boolean value, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_server_url() {
    let output = scribe_booth_bin()
        .args(["config", "set", "server_url", "not-a-url"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("http"),
        "Expected error about URL scheme, got: {}",
        stderr
    );
}

#[test]
#[cfg(target_os = "linux")]
fn config_set_get_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = scribe_booth_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "device", "USB Mic"])
        .output()
        .expect("Failed to execute command");
    assert!(
        output.status.success(),
        "set failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = scribe_booth_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "get", "device"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("USB Mic"), "got: {}", stdout);
}

#[test]
#[cfg(target_os = "linux")]
fn config_init_twice_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = scribe_booth_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "init"])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let output = scribe_booth_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "init"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
}

#[test]
fn missing_api_key_error() {
    // The profiles command needs an API key but never touches audio,
    // so it fails fast with a clear message
    let output = scribe_booth_bin()
        .env_remove("SCRIBE_API_KEY")
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .args(["profiles", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("API") || stderr.contains("api_key"),
        "Expected error about missing API key, got: {}",
        stderr
    );
}

#[test]
fn masked_api_key_in_config_get() {
    #[cfg(target_os = "linux")]
    {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let output = scribe_booth_bin()
            .env("XDG_CONFIG_HOME", dir.path())
            .args(["config", "set", "api_key", "abcdefghijklmnop"])
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());

        let output = scribe_booth_bin()
            .env("XDG_CONFIG_HOME", dir.path())
            .args(["config", "get", "api_key"])
            .output()
            .expect("Failed to execute command");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("abcd...mnop"), "got: {}", stdout);
        assert!(!stdout.contains("abcdefghijklmnop"));
    }
}
