//! The operations a transport layer calls.

use std::sync::Arc;
use std::time::Duration;

use keylock_core::config::MAX_TOKEN_TTL_SECS;
use keylock_core::{Config, SecretString};
use tracing::debug;

use crate::credential::CredentialStore;
use crate::digest_store::{DigestStore, FileDigestStore};
use crate::ephemeral::{EphemeralStore, MemoryEphemeralStore};
use crate::error::{AuthError, Result};
use crate::guard::TokenGuard;
use crate::hasher::SecretHasher;
use crate::issuer::TokenIssuer;
use crate::token::TokenGenerator;
use crate::types::Token;
use crate::validator::TokenValidator;

/// Key verification and token lifecycle behind one handle.
///
/// Both stores are injected, so the same facade runs against files and an
/// in-process TTL map in production or against in-memory fakes in tests.
pub struct KeyLock {
    credentials: Arc<CredentialStore>,
    issuer: TokenIssuer,
    validator: Arc<TokenValidator>,
}

impl KeyLock {
    /// Wire the components from `config` around the given stores.
    pub fn new(
        config: &Config,
        digests: Arc<dyn DigestStore>,
        tokens: Arc<dyn EphemeralStore>,
    ) -> Result<Self> {
        let ttl_secs = config.tokens.ttl_secs;
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&ttl_secs) {
            return Err(AuthError::InvalidConfig(format!(
                "tokens.ttl_secs must be 1-{MAX_TOKEN_TTL_SECS}, got {ttl_secs}"
            )));
        }

        let hasher = SecretHasher::new(&config.auth)?;
        let generator = TokenGenerator::new(&config.tokens)?;
        let ttl = Duration::from_secs(ttl_secs);

        let credentials = Arc::new(CredentialStore::new(hasher, digests));
        let issuer = TokenIssuer::new(credentials.clone(), generator, tokens.clone(), ttl);
        let validator = Arc::new(TokenValidator::new(tokens));

        Ok(Self {
            credentials,
            issuer,
            validator,
        })
    }

    /// File-backed digest under the configured storage dir, tokens in memory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let dir = config.storage_dir()?;
        debug!(dir = %dir.display(), "using file digest store");
        Self::new(
            config,
            Arc::new(FileDigestStore::new(dir)),
            Arc::new(MemoryEphemeralStore::new()),
        )
    }

    /// Whether `secret` is the active key.
    pub async fn verify(&self, secret: &str) -> Result<bool> {
        self.credentials.verify_secret(secret).await
    }

    /// Replace the active key. Outstanding tokens stay valid.
    pub async fn rotate_secret(&self, new_secret: &SecretString) -> Result<()> {
        self.credentials.set_secret(new_secret).await
    }

    /// Exchange the key for a token, or `None` if the key is wrong.
    pub async fn issue_token(&self, secret: &str) -> Result<Option<Token>> {
        self.issuer.issue(secret).await
    }

    pub async fn is_token_valid(&self, token: Option<&str>) -> Result<bool> {
        self.validator.is_valid(token).await
    }

    /// Character count of the active key.
    pub async fn current_secret_length(&self) -> Result<usize> {
        self.credentials.secret_length().await
    }

    /// A guard sharing this facade's token store.
    pub fn guard(&self) -> TokenGuard {
        TokenGuard::new(self.validator.clone())
    }

    pub fn token_ttl(&self) -> Duration {
        self.issuer.ttl()
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}
