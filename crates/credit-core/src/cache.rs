//! Cache trait for the corporation-code directory.
//!
//! This module defines the [`DirectoryCache`] trait. The directory is the only
//! state shared between lookups; everything else is request-scoped.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{directory::CorpDirectory, error::Result};

/// Trait for caching the downloaded corporation directory.
///
/// Implementations may keep the directory in memory or skip caching entirely.
/// Entries live until [`clear`](Self::clear) is called.
#[async_trait]
pub trait DirectoryCache: Send + Sync {
    /// Retrieves the cached directory for a provider.
    ///
    /// Returns `Ok(Some(directory))` if cached, `Ok(None)` if not cached.
    async fn get_directory(&self, provider: &str) -> Result<Option<Arc<CorpDirectory>>>;

    /// Stores a directory in the cache, replacing any previous one.
    async fn put_directory(&self, provider: &str, directory: Arc<CorpDirectory>) -> Result<()>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
