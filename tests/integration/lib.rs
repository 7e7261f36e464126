//! Shared fixtures for the integration tests.

use std::sync::Arc;

use keylock_auth::{DigestStore, EphemeralStore, KeyLock};
use keylock_core::{Config, SecretString};

/// A valid config with cheap hashing parameters.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.salt = SecretString::new("integration-salt");
    config.auth.app_secret = SecretString::new("integration-app-secret");
    config.auth.hashing.memory_kib = 64;
    config.auth.hashing.iterations = 1;
    config.auth.hashing.parallelism = 1;
    config
}

/// Build a facade over the given stores.
pub fn keylock(
    config: &Config,
    digests: Arc<dyn DigestStore>,
    tokens: Arc<dyn EphemeralStore>,
) -> Arc<KeyLock> {
    Arc::new(KeyLock::new(config, digests, tokens).expect("test config is valid"))
}
