//! The single shared key: set, verify, and length lookup.

use std::sync::Arc;

use keylock_core::SecretString;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

use crate::digest_store::DigestStore;
use crate::error::{AuthError, Result};
use crate::hasher::SecretHasher;
use crate::types::{SecretDigest, SecretMetadata};

/// Owns the active key digest and its length hint.
///
/// Every verification re-reads the persisted digest, so a rotation made by
/// another process sharing the same [`DigestStore`] takes effect without a
/// restart. Rotations within this process are serialized; the last write
/// wins.
pub struct CredentialStore {
    hasher: SecretHasher,
    store: Arc<dyn DigestStore>,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(hasher: SecretHasher, store: Arc<dyn DigestStore>) -> Self {
        Self {
            hasher,
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the active key.
    ///
    /// Tokens issued under the previous key stay valid until they expire. If
    /// the length cannot be saved, the previous digest is put back so the
    /// active key and its length never disagree.
    #[instrument(skip_all)]
    pub async fn set_secret(&self, secret: &SecretString) -> Result<()> {
        if self.hasher.normalize(secret.expose_secret()).is_empty() {
            return Err(AuthError::EmptySecret);
        }

        let digest = self.compute(secret.clone()).await?;
        let length = secret.char_count();

        let _guard = self.write_lock.lock().await;
        let previous = self.store.load_digest().await?;
        self.store.save_digest(&digest).await?;
        if let Err(e) = self.store.save_length(length).await {
            self.restore(previous).await;
            return Err(e.into());
        }

        info!(length, "shared key updated");
        Ok(())
    }

    /// Undo a digest write whose length write failed.
    async fn restore(&self, previous: Option<SecretDigest>) {
        let result = match &previous {
            Some(digest) => self.store.save_digest(digest).await,
            None => self.store.clear().await,
        };
        if let Err(e) = result {
            error!(error = %e, "failed to restore previous key after partial update");
        }
    }

    /// Check a candidate key against the active digest.
    ///
    /// Returns `false` when no key has been set. The candidate is hashed
    /// either way so the two cases take the same time.
    #[instrument(skip_all)]
    pub async fn verify_secret(&self, candidate: &str) -> Result<bool> {
        let stored = self.store.load_digest().await?;
        let computed = self.compute(SecretString::new(candidate)).await?;

        let matched = stored.is_some_and(|digest| digest.matches(&computed));
        debug!(matched, "key verification finished");
        Ok(matched)
    }

    /// Character count of the active key.
    pub async fn secret_length(&self) -> Result<usize> {
        self.store
            .load_length()
            .await?
            .ok_or(AuthError::NoSecretConfigured)
    }

    /// Metadata about the active key.
    pub async fn metadata(&self) -> Result<SecretMetadata> {
        let length = self.secret_length().await?;
        Ok(SecretMetadata { length })
    }

    /// Whether a key has ever been set.
    pub async fn is_configured(&self) -> Result<bool> {
        Ok(self.store.load_digest().await?.is_some())
    }

    /// Hash on the blocking pool.
    async fn compute(&self, secret: SecretString) -> Result<SecretDigest> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.digest(secret.expose_secret()))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }
}
