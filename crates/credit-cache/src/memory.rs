//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use credit_core::{CorpDirectory, DirectoryCache, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Cache entry with the time it was stored.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }
}

/// Process-wide in-memory directory cache.
///
/// Directories are stored per provider behind a `RwLock` and shared as
/// `Arc`s, so a hit never copies the directory. Entries live until cleared
/// or the cache is dropped.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryCache {
    directories: RwLock<HashMap<String, CacheEntry<Arc<CorpDirectory>>>>,
}

impl InMemoryDirectoryCache {
    /// Create a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached directories.
    pub async fn len(&self) -> usize {
        self.directories.read().await.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.directories.read().await.is_empty()
    }
}

#[async_trait]
impl DirectoryCache for InMemoryDirectoryCache {
    #[instrument(skip(self), fields(provider = %provider))]
    async fn get_directory(&self, provider: &str) -> Result<Option<Arc<CorpDirectory>>> {
        let cache = self.directories.read().await;
        match cache.get(provider) {
            Some(entry) => {
                debug!(cached_at = %entry.cached_at, "Cache hit for corporation directory");
                Ok(Some(Arc::clone(&entry.data)))
            }
            None => {
                debug!("Cache miss for corporation directory");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, directory), fields(provider = %provider, companies = directory.len()))]
    async fn put_directory(&self, provider: &str, directory: Arc<CorpDirectory>) -> Result<()> {
        let mut cache = self.directories.write().await;
        cache.insert(provider.to_string(), CacheEntry::new(directory));
        debug!("Cached corporation directory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.directories.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_core::{CorpEntry, StockCode};

    fn directory() -> Arc<CorpDirectory> {
        Arc::new(CorpDirectory::from_entries(vec![CorpEntry::new(
            "00159616", "034020", "X Corp",
        )]))
    }

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = InMemoryDirectoryCache::new();

        // Initially no data
        assert!(cache.get_directory("DART").await.unwrap().is_none());

        cache.put_directory("DART", directory()).await.unwrap();

        let cached = cache.get_directory("DART").await.unwrap().unwrap();
        assert!(cached.contains(&StockCode::new("034020")));
        assert!(cache.get_directory("other").await.unwrap().is_none());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_cache_shares_directory() {
        let cache = InMemoryDirectoryCache::new();
        let dir = directory();
        cache.put_directory("DART", Arc::clone(&dir)).await.unwrap();

        let cached = cache.get_directory("DART").await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&dir, &cached));
    }

    #[tokio::test]
    async fn test_memory_cache_clear() {
        let cache = InMemoryDirectoryCache::new();
        cache.put_directory("DART", directory()).await.unwrap();

        cache.clear().await.unwrap();

        assert!(cache.get_directory("DART").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_cache_entries_persist_until_clear() {
        let cache = InMemoryDirectoryCache::new();
        cache.put_directory("DART", directory()).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(cache.get_directory("DART").await.unwrap().is_some());

        cache.clear().await.unwrap();
        assert!(cache.get_directory("DART").await.unwrap().is_none());
    }
}
