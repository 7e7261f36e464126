//! Path resolution utilities.

use crate::env::{self, vars};
use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the Keylock base directory.
///
/// `KEYLOCK_HOME` wins when set; otherwise `~/.keylock`.
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = env::get_var(vars::KEYLOCK_HOME) {
        return Ok(expand_tilde(&home));
    }

    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".keylock"))
}

/// Get the main config file path (~/.keylock/keylock.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("keylock.json5"))
}

/// Get the directory holding the persisted key digest (~/.keylock/credential).
pub fn credential_dir() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("credential"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_under_base_dir() {
        let base = base_dir().unwrap();
        let config = config_file().unwrap();
        assert!(config.starts_with(&base));
        assert!(config.ends_with("keylock.json5"));
    }

    #[test]
    fn test_credential_dir() {
        let dir = credential_dir().unwrap();
        assert!(dir.ends_with("credential"));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/keys");
        assert!(!expanded.to_string_lossy().contains('~'));

        let untouched = expand_tilde("/var/lib/keylock");
        assert_eq!(untouched, PathBuf::from("/var/lib/keylock"));
    }
}
