//! TTL-bounded request de-duplication
//!
//! One entry per key holds a shared handle to the fetch future. The entry is
//! stored *before* the fetch makes any progress, so a second caller arriving
//! while the first fetch is still in flight binds to the same future instead
//! of starting another remote call.
//!
//! Entries are only ever replaced because of age. A fetch that failed stays
//! cached until its TTL runs out; callers retry after the window passes.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Freshness window for cached fetches
pub const DEFAULT_REQUEST_TTL: Duration = Duration::from_secs(5 * 60);

/// Cloneable handle to a fetch that may still be pending
pub type SharedFetch<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

struct CacheEntry<T, E> {
    fetch: SharedFetch<T, E>,
    created_at: Instant,
}

/// Memoizes in-flight and recently completed fetches per key
pub struct TtlRequestCache<K, T, E> {
    entries: Mutex<HashMap<K, CacheEntry<T, E>>>,
    ttl: Duration,
}

impl<K, T, E> TtlRequestCache<K, T, E>
where
    K: Eq + Hash + Debug,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached fetch for `key` while it is fresh, otherwise start a
    /// new one with `fetcher` and cache it immediately.
    ///
    /// A fresh entry is returned unchanged even if it is still pending or has
    /// already failed.
    pub fn get_or_fetch<F, Fut>(&self, key: K, fetcher: F) -> SharedFetch<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = entries.get(&key) {
            let age = now.saturating_duration_since(entry.created_at);
            if age < self.ttl {
                debug!(key = ?key, age_ms = age.as_millis() as u64, "Request cache hit");
                return entry.fetch.clone();
            }
            debug!(key = ?key, "Request cache entry expired, refetching");
        } else {
            debug!(key = ?key, "Request cache miss");
        }

        let fetch = fetcher().boxed().shared();
        entries.insert(
            key,
            CacheEntry {
                fetch: fetch.clone(),
                created_at: now,
            },
        );
        fetch
    }

    /// Whether `key` has an entry younger than the TTL
    pub fn is_fresh(&self, key: &K) -> bool {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|entry| now.saturating_duration_since(entry.created_at) < self.ttl)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Test hook; nothing in the engine's normal flow evicts.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<K, T, E> Default for TtlRequestCache<K, T, E>
where
    K: Eq + Hash + Debug,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TTL)
    }
}
