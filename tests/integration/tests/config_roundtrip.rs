//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use keylock_core::config::{BindMode, Config, LogFormat};
use keylock_core::SecretString;
use keylock_integration_tests::test_config;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keylock.json5");

    let config = test_config();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.gateway.port, config.gateway.port);
    assert_eq!(loaded.gateway.bind, config.gateway.bind);
    assert_eq!(loaded.tokens, config.tokens);
    assert_eq!(loaded.auth.hashing, config.auth.hashing);
    // Deployment secrets must survive, or stored digests stop verifying.
    assert_eq!(loaded.auth.salt, config.auth.salt);
    assert_eq!(loaded.auth.app_secret, config.auth.app_secret);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keylock.json5");

    let mut config = test_config();
    config.gateway.port = 9090;
    config.gateway.bind = BindMode::Lan;
    config.logging.format = LogFormat::Json;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.gateway.port, 9090);
    assert_eq!(loaded.gateway.bind, BindMode::Lan);
    assert_eq!(loaded.logging.format, LogFormat::Json);
}

#[cfg(unix)]
#[test]
fn test_saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keylock.json5");
    test_config().save(&path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/keylock.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}

#[test]
fn test_secret_fields_do_not_debug_print() {
    let mut config = test_config();
    config.auth.app_secret = SecretString::new("very-private-pepper");
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("very-private-pepper"));
}
