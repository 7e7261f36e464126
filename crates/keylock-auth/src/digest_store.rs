//! Durable storage for the key digest and its length hint.
//!
//! Defines the [`DigestStore`] trait and two backends: [`FileDigestStore`],
//! which keeps each value in its own file, and [`MemoryDigestStore`] for
//! tests and embedding.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::types::SecretDigest;

/// File holding the hex-encoded digest.
const DIGEST_FILE: &str = "key.digest";

/// File holding the decimal length hint.
const LENGTH_FILE: &str = "key.length";

/// Async trait for durable digest storage.
///
/// Saves replace the previous value. Loads return `None` when nothing has
/// been saved yet. A reader never observes a partially written value.
#[async_trait]
pub trait DigestStore: Send + Sync {
    async fn save_digest(&self, digest: &SecretDigest) -> Result<(), StoreError>;

    async fn load_digest(&self) -> Result<Option<SecretDigest>, StoreError>;

    async fn save_length(&self, length: usize) -> Result<(), StoreError>;

    async fn load_length(&self) -> Result<Option<usize>, StoreError>;

    /// Remove the digest and the length. Clearing an empty store is a no-op.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// A file-system-backed digest store.
///
/// Writes go to a temporary file that is renamed into place, so concurrent
/// readers see either the old or the new value. Files are created with mode
/// `0600` inside a `0700` directory on Unix.
pub struct FileDigestStore {
    base_dir: PathBuf,
}

impl FileDigestStore {
    /// Create a store rooted at `base_dir`. The directory is created lazily.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Ensure the base directory exists with restrictive permissions.
    async fn ensure_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.base_dir).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            tokio::fs::set_permissions(&self.base_dir, perms).await?;
        }

        Ok(())
    }

    async fn write(&self, name: &str, contents: &str) -> Result<(), StoreError> {
        self.ensure_dir().await?;

        let path = self.base_dir.join(name);
        let temp_path = self.base_dir.join(format!("{name}.tmp"));
        // A leftover from an interrupted write may carry other permissions.
        self.remove(&temp_path).await?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&temp_path).await?;
        file.write_all(contents.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&temp_path, &path).await?;
        debug!(path = %path.display(), "wrote credential record");
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<(), StoreError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.base_dir.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl DigestStore for FileDigestStore {
    async fn save_digest(&self, digest: &SecretDigest) -> Result<(), StoreError> {
        self.write(DIGEST_FILE, &digest.to_hex()).await
    }

    async fn load_digest(&self) -> Result<Option<SecretDigest>, StoreError> {
        let Some(contents) = self.read(DIGEST_FILE).await? else {
            return Ok(None);
        };

        let digest = SecretDigest::from_hex(&contents).map_err(|e| StoreError::Corrupt {
            name: DIGEST_FILE.to_string(),
            reason: e.to_string(),
        })?;
        if digest.is_empty() {
            return Err(StoreError::Corrupt {
                name: DIGEST_FILE.to_string(),
                reason: "empty digest".to_string(),
            });
        }
        Ok(Some(digest))
    }

    async fn save_length(&self, length: usize) -> Result<(), StoreError> {
        self.write(LENGTH_FILE, &length.to_string()).await
    }

    async fn load_length(&self) -> Result<Option<usize>, StoreError> {
        let Some(contents) = self.read(LENGTH_FILE).await? else {
            return Ok(None);
        };

        contents
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: std::num::ParseIntError| StoreError::Corrupt {
                name: LENGTH_FILE.to_string(),
                reason: e.to_string(),
            })
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.remove(&self.base_dir.join(DIGEST_FILE)).await?;
        self.remove(&self.base_dir.join(LENGTH_FILE)).await?;
        debug!(dir = %self.base_dir.display(), "cleared credential records");
        Ok(())
    }
}

/// An in-memory digest store. Contents are lost when it is dropped.
#[derive(Default)]
pub struct MemoryDigestStore {
    digest: RwLock<Option<SecretDigest>>,
    length: RwLock<Option<usize>>,
}

impl MemoryDigestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DigestStore for MemoryDigestStore {
    async fn save_digest(&self, digest: &SecretDigest) -> Result<(), StoreError> {
        *self.digest.write().await = Some(digest.clone());
        Ok(())
    }

    async fn load_digest(&self) -> Result<Option<SecretDigest>, StoreError> {
        Ok(self.digest.read().await.clone())
    }

    async fn save_length(&self, length: usize) -> Result<(), StoreError> {
        *self.length.write().await = Some(length);
        Ok(())
    }

    async fn load_length(&self) -> Result<Option<usize>, StoreError> {
        Ok(*self.length.read().await)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.digest.write().await = None;
        *self.length.write().await = None;
        Ok(())
    }
}
