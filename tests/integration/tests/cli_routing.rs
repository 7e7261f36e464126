//! CLI binary integration tests.
//!
//! These tests exercise the compiled `keylock` binary to verify that
//! top-level command routing, help text, and the key commands work
//! end to end against a temporary home directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Locate the compiled `keylock` binary in the workspace target directory.
///
/// Cargo sets `CARGO_MANIFEST_DIR` to the manifest directory of the package
/// being tested. We navigate up to the workspace root and look inside
/// `target/debug/`.
fn keylock_bin() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> workspace root
    let workspace_root = manifest_dir
        .parent()
        .expect("tests/ parent")
        .parent()
        .expect("workspace root");
    let bin = workspace_root.join("target").join("debug").join("keylock");
    assert!(
        bin.exists(),
        "keylock binary not found at {}; run `cargo build -p keylock-cli` first",
        bin.display()
    );
    bin
}

/// A command isolated from the caller's environment and home directory.
fn keylock_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(keylock_bin());
    cmd.env("KEYLOCK_HOME", home)
        .env_remove("KEYLOCK_CONFIG")
        .env_remove("KEYLOCK_SALT")
        .env_remove("KEYLOCK_APP_SECRET")
        .env_remove("KEYLOCK_INITIAL_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    keylock_cmd(home)
        .args(args)
        .output()
        .expect("failed to run keylock")
}

#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["version"]);
    assert!(output.status.success(), "version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("keylock"),
        "version output should contain 'keylock', got: {}",
        stdout
    );
}

#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["--help"]);
    assert!(output.status.success(), "--help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["serve", "set-key", "verify", "key-length", "config"] {
        assert!(
            stdout.contains(command),
            "help output should mention '{}', got: {}",
            command,
            stdout
        );
    }
}

#[test]
fn test_cli_unknown_command() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["nonexistent-command"]);
    assert!(
        !output.status.success(),
        "unknown command should return non-zero exit code"
    );
}

#[test]
fn test_cli_key_commands_end_to_end() {
    let home = TempDir::new().unwrap();
    let home = home.path();

    let output = run(home, &["config", "init"]);
    assert!(output.status.success(), "config init: {:?}", output);
    assert!(home.join("keylock.json5").exists());

    let output = run(home, &["key-length"]);
    assert!(!output.status.success(), "key-length before set-key should fail");

    let output = run(home, &["set-key", "--value", "hunter2"]);
    assert!(output.status.success(), "set-key: {:?}", output);
    assert!(home.join("credential").join("key.digest").exists());

    let output = run(home, &["verify", "--value", "hunter2"]);
    assert!(output.status.success(), "correct key should verify");

    let output = run(home, &["verify", "--value", "Hunter2"]);
    assert!(!output.status.success(), "wrong case should not verify");

    let output = run(home, &["key-length"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "7");
}

#[test]
fn test_cli_config_show_redacts_secrets() {
    let home = TempDir::new().unwrap();
    assert!(run(home.path(), &["config", "init"]).status.success());

    let output = run(home.path(), &["config", "show"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[REDACTED]"), "got: {}", stdout);
}

#[test]
fn test_cli_set_key_requires_valid_config() {
    let home = TempDir::new().unwrap();
    // No config file: defaults carry no salt or application secret.
    let output = run(home.path(), &["set-key", "--value", "hunter2"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("auth.salt"), "got: {}", stderr);
}
