//! Cache-or-fetch policy over any repository

use super::{Change, InitiativeRepository, RepositoryResult};
use crate::model::Initiative;
use crate::services::InitiativeCache;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Serves loads from the initiatives cache bucket when it holds a list,
/// otherwise loads from `inner` and fills the cache. Writes go straight to
/// `inner` and drop the cache.
///
/// A cache fill and a write never overlap: both hold `sync` from the inner
/// call until the cache has been filled or dropped, so a fill can never
/// store a list that an overlapping write has already made stale.
pub struct CachedRepository<R> {
    inner: R,
    cache: InitiativeCache,
    sync: Mutex<()>,
}

impl<R: InitiativeRepository> CachedRepository<R> {
    pub fn new(inner: R, cache: InitiativeCache) -> Self {
        Self {
            inner,
            cache,
            sync: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drop the cached list so the next load goes to `inner`
    pub fn invalidate(&self) {
        if !self.cache.clear() {
            warn!("Failed to clear initiatives cache");
        }
    }
}

#[async_trait]
impl<R: InitiativeRepository> InitiativeRepository for CachedRepository<R> {
    async fn load_all(&self) -> RepositoryResult<Vec<Initiative>> {
        if let Some(cached) = self.cache.get() {
            debug!("Serving {} initiatives from cache", cached.len());
            return Ok(cached);
        }

        let _guard = self.sync.lock().await;
        // another caller may have filled it while we waited
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let fresh = self.inner.load_all().await?;
        if let Err(e) = self.cache.set(&fresh) {
            warn!("Could not cache initiatives: {}", e);
        }
        Ok(fresh)
    }

    async fn append(&self, initiative: Initiative) -> RepositoryResult<Initiative> {
        let _guard = self.sync.lock().await;
        let result = self.inner.append(initiative).await;
        self.invalidate();
        result
    }

    async fn update(&self, initiative: Initiative) -> RepositoryResult<Initiative> {
        let _guard = self.sync.lock().await;
        let result = self.inner.update(initiative).await;
        self.invalidate();
        result
    }

    async fn modify(&self, uid: &str, change: Change) -> RepositoryResult<Initiative> {
        let _guard = self.sync.lock().await;
        let result = self.inner.modify(uid, change).await;
        self.invalidate();
        result
    }
}
