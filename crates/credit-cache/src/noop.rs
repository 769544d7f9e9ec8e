//! No-op cache implementation.

use async_trait::async_trait;
use credit_core::{CorpDirectory, DirectoryCache, Result};
use std::sync::Arc;
use tracing::trace;

/// A no-op cache that doesn't store anything.
///
/// `get_directory` always returns `Ok(None)`, so every lookup downloads the
/// directory afresh. Useful for disabling caching.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DirectoryCache for NoopCache {
    async fn get_directory(&self, _provider: &str) -> Result<Option<Arc<CorpDirectory>>> {
        trace!("NoopCache: get_directory called, returning None");
        Ok(None)
    }

    async fn put_directory(&self, _provider: &str, _directory: Arc<CorpDirectory>) -> Result<()> {
        trace!("NoopCache: put_directory called, doing nothing");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_never_returns_data() {
        let cache = NoopCache::new();
        cache
            .put_directory("DART", Arc::new(CorpDirectory::default()))
            .await
            .unwrap();
        assert!(cache.get_directory("DART").await.unwrap().is_none());
        cache.clear().await.unwrap();
    }
}
