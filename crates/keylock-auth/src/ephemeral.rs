//! TTL key-value store contract and an in-process implementation.
//!
//! The token layer only needs two operations: set a key with a lifetime, and
//! read it back. Expiry belongs entirely to the store; callers never delete.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::error::StoreError;

/// A shared key-value store whose entries expire on their own.
///
/// Implementations must make `set` and `get` atomic and safe to call from
/// many tasks at once. `get` on an expired key returns `None`.
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-memory [`EphemeralStore`] backed by a concurrent map.
///
/// Expired entries are dropped when read, by [`purge_expired`], or by the
/// background task from [`spawn_sweeper`]. Time comes from tokio's clock, so
/// tests can pause and advance it.
///
/// [`purge_expired`]: MemoryEphemeralStore::purge_expired
/// [`spawn_sweeper`]: MemoryEphemeralStore::spawn_sweeper
#[derive(Default)]
pub struct MemoryEphemeralStore {
    entries: DashMap<String, Entry>,
}

impl MemoryEphemeralStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Purge expired entries every `every` until the handle is aborted.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                let removed = store.purge_expired();
                if removed > 0 {
                    debug!(removed, "purged expired entries");
                }
            }
        })
    }
}

#[async_trait]
impl EphemeralStore for MemoryEphemeralStore {
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        if ttl.is_zero() {
            return Err(StoreError::InvalidTtl(ttl));
        }
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(StoreError::InvalidTtl(ttl))?;

        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_set_and_get_before_expiry() {
        let store = MemoryEphemeralStore::new();
        store.set("k", b"valid", Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(store.get("k").await.unwrap(), Some(b"valid".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires() {
        let store = MemoryEphemeralStore::new();
        store.set("k", b"valid", Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty(), "expired entry should be evicted on read");
    }

    #[tokio::test]
    async fn test_missing_key() {
        let store = MemoryEphemeralStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected() {
        let store = MemoryEphemeralStore::new();
        assert!(matches!(
            store.set("k", b"v", Duration::ZERO).await,
            Err(StoreError::InvalidTtl(_))
        ));
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_rejected() {
        let store = MemoryEphemeralStore::new();
        assert!(matches!(
            store.set("k", b"v", Duration::MAX).await,
            Err(StoreError::InvalidTtl(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_do_not_extend_ttl() {
        let store = MemoryEphemeralStore::new();
        store.set("k", b"v", Duration::from_secs(10)).await.unwrap();

        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(1)).await;
            assert!(store.get("k").await.unwrap().is_some());
        }
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let store = MemoryEphemeralStore::new();
        store.set("short", b"v", Duration::from_secs(1)).await.unwrap();
        store.set("long", b"v", Duration::from_secs(100)).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_in_background() {
        let store = Arc::new(MemoryEphemeralStore::new());
        store.set("k", b"v", Duration::from_secs(1)).await.unwrap();
        let handle = store.spawn_sweeper(Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(store.is_empty());
        handle.abort();
    }
}
