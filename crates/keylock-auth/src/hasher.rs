//! Argon2id digest of the shared key.
//!
//! The hashed material is `key || salt || app_secret`, and the salt is also
//! Argon2's salt parameter. Output is deterministic for fixed inputs, so a
//! stored digest can be compared against a freshly computed one.

use argon2::{Algorithm, Argon2, Params, Version};
use keylock_core::config::{AuthConfig, HashingConfig, MAX_SALT_LEN, MIN_SALT_LEN};
use keylock_core::SecretString;
use zeroize::Zeroizing;

use crate::error::{AuthError, Result};
use crate::types::SecretDigest;

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// Computes [`SecretDigest`]s from candidate keys.
#[derive(Clone)]
pub struct SecretHasher {
    salt: SecretString,
    app_secret: SecretString,
    strip_whitespace: bool,
    params: Params,
}

impl SecretHasher {
    /// Build a hasher from the auth section of the config.
    ///
    /// Fails if the salt length or cost parameters are outside what Argon2
    /// accepts, so [`SecretHasher::digest`] only fails on resource exhaustion.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let salt_len = config.salt.len();
        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&salt_len) {
            return Err(AuthError::InvalidConfig(format!(
                "salt must be {MIN_SALT_LEN}-{MAX_SALT_LEN} bytes, got {salt_len}"
            )));
        }
        if config.app_secret.is_empty() {
            return Err(AuthError::InvalidConfig(
                "application secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            salt: config.salt.clone(),
            app_secret: config.app_secret.clone(),
            strip_whitespace: config.strip_whitespace,
            params: build_params(&config.hashing)?,
        })
    }

    /// Apply the configured normalization to a key.
    pub fn normalize(&self, secret: &str) -> Zeroizing<String> {
        if self.strip_whitespace {
            Zeroizing::new(secret.chars().filter(|c| !c.is_whitespace()).collect())
        } else {
            Zeroizing::new(secret.to_string())
        }
    }

    /// Hash a key into its digest.
    pub fn digest(&self, secret: &str) -> Result<SecretDigest> {
        let normalized = self.normalize(secret);
        let salt = self.salt.expose_bytes();
        let app_secret = self.app_secret.expose_bytes();

        let mut material =
            Zeroizing::new(Vec::with_capacity(normalized.len() + salt.len() + app_secret.len()));
        material.extend_from_slice(normalized.as_bytes());
        material.extend_from_slice(salt);
        material.extend_from_slice(app_secret);

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        let mut out = vec![0u8; DIGEST_LEN];
        argon2
            .hash_password_into(&material, salt, &mut out)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(SecretDigest::from_bytes(out))
    }
}

fn build_params(hashing: &HashingConfig) -> Result<Params> {
    Params::new(
        hashing.memory_kib,
        hashing.iterations,
        hashing.parallelism,
        Some(DIGEST_LEN),
    )
    .map_err(|e| AuthError::InvalidConfig(format!("invalid Argon2 parameters: {e}")))
}
