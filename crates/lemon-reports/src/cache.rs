//! Single-flight report list cache keyed by [`lemon_core::Scope::cache_key`].
//!
//! Concurrent reads for the same key share one in-flight fetch. A failed
//! fetch leaves the entry empty so the next read retries. Invalidation drops
//! the entry; fetches already in flight finish into the detached cell and are
//! never observed again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use lemon_core::Report;
use tokio::sync::OnceCell;

type Entry = Arc<OnceCell<Arc<Vec<Report>>>>;

#[derive(Debug, Default)]
pub struct ListCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl ListCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached list for `key`, fetching it once if absent.
    ///
    /// # Errors
    ///
    /// Propagates the fetch error; nothing is cached in that case.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<Arc<Vec<Report>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Report>, E>>,
    {
        let entry = Arc::clone(
            self.lock()
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        );
        let reports = entry
            .get_or_try_init(|| async move { fetch().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(reports))
    }

    /// Mark `key` stale. Call only after the server confirmed a write.
    pub fn invalidate(&self, key: &str) {
        if self.lock().remove(key).is_some() {
            tracing::debug!(key, "report list invalidated");
        }
    }

    /// Drop every entry, used when the active identity changes.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Whether a completed list is cached for `key`.
    #[must_use]
    pub fn is_fresh(&self, key: &str) -> bool {
        self.lock().get(key).is_some_and(|cell| cell.initialized())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
