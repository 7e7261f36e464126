//! Configuration loading and persistence.

use super::Config;
use crate::env::{self, vars};
use crate::error::ConfigError;
use crate::paths;
use crate::secret::SecretString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Salt length bounds accepted by Argon2.
pub const MIN_SALT_LEN: usize = 8;
pub const MAX_SALT_LEN: usize = 64;

/// Minimum token entropy in bits.
pub const MIN_TOKEN_ENTROPY_BITS: f64 = 72.0;

/// Longest token lifetime accepted, one year in seconds.
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

impl Config {
    /// Resolve the config file path: `KEYLOCK_CONFIG`, else the default location.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        match env::get_var(vars::KEYLOCK_CONFIG) {
            Some(path) => Ok(paths::expand_tilde(&path)),
            None => paths::config_file(),
        }
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        debug!(path = %path.display(), "loading configuration");
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = Self::default_path()?;
        self.save(&path)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;

        #[cfg(unix)]
        {
            // The file carries the salt and application secret.
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overlay values from the environment onto this configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Some(salt) = env::get_var(vars::KEYLOCK_SALT) {
            self.auth.salt = SecretString::new(salt);
        }
        if let Some(app_secret) = env::get_var(vars::KEYLOCK_APP_SECRET) {
            self.auth.app_secret = SecretString::new(app_secret);
        }
        if let Some(ttl) = env::get_u64(vars::KEYLOCK_TOKEN_TTL) {
            self.tokens.ttl_secs = ttl;
        }
        if let Some(port) = env::get_u16(vars::KEYLOCK_PORT) {
            self.gateway.port = port;
        }
    }

    /// Directory holding the persisted digest.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.dir {
            Some(dir) => Ok(paths::expand_tilde(&dir.to_string_lossy())),
            None => paths::credential_dir(),
        }
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        // 1. Deployment secrets
        let salt_len = self.auth.salt.len();
        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&salt_len) {
            errors.push(format!(
                "auth.salt must be {}-{} bytes, got {}",
                MIN_SALT_LEN, MAX_SALT_LEN, salt_len
            ));
        }
        if self.auth.app_secret.is_empty() {
            errors.push("auth.app_secret must not be empty".to_string());
        }

        // 2. Argon2 cost parameters
        let hashing = &self.auth.hashing;
        if hashing.iterations == 0 {
            errors.push("auth.hashing.iterations must be at least 1".to_string());
        }
        if hashing.parallelism == 0 {
            errors.push("auth.hashing.parallelism must be at least 1".to_string());
        }
        if hashing.memory_kib < 8 * hashing.parallelism.max(1) {
            errors.push(format!(
                "auth.hashing.memory_kib must be at least 8 * parallelism ({}), got {}",
                8 * hashing.parallelism.max(1),
                hashing.memory_kib
            ));
        }

        // 3. Token shape
        let tokens = &self.tokens;
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&tokens.ttl_secs) {
            errors.push(format!(
                "tokens.ttl_secs must be 1-{}, got {}",
                MAX_TOKEN_TTL_SECS, tokens.ttl_secs
            ));
        }
        if tokens.segment_count == 0 || tokens.segment_length == 0 {
            errors.push(
                "tokens.segment_count and tokens.segment_length must be non-zero".to_string(),
            );
        }
        if tokens.separator.is_empty() {
            errors.push("tokens.separator must not be empty".to_string());
        }
        if tokens.alphabet_size() < 2 {
            errors.push("tokens.alphabet must contain at least 2 distinct characters".to_string());
        }
        if !tokens.separator.is_empty()
            && tokens
                .alphabet
                .chars()
                .any(|c| tokens.separator.contains(c))
        {
            errors.push("tokens.alphabet must not contain the separator".to_string());
        }
        let bits = tokens.entropy_bits();
        if bits < MIN_TOKEN_ENTROPY_BITS {
            errors.push(format!(
                "tokens carry {:.1} bits of entropy, at least {} required",
                bits, MIN_TOKEN_ENTROPY_BITS
            ));
        }

        // 4. Gateway
        if self.gateway.port == 0 {
            errors.push("Gateway port cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}
