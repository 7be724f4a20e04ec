//! Process-wide metadata cache with request coalescing
//!
//! One entry per package name. An entry is served straight from memory
//! while it is fresh, revalidated with `If-None-Match` once it has expired,
//! and never evicted. Concurrent callers asking for the same uncached name
//! all await one shared in-flight fetch, so the registry sees exactly one
//! request per name per freshness window.

use crate::client::{FetchOutcome, RegistryClient};
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use pkgtree_errors::Error;
use pkgtree_types::MetaDocument;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Freshness window for a cached metadata document
const META_TTL: Duration = Duration::from_secs(60);

type PendingFetch = Shared<BoxFuture<'static, Result<Arc<MetaDocument>, Error>>>;

#[derive(Default)]
struct CacheEntry {
    expires: Option<Instant>,
    etag: Option<String>,
    data: Option<Arc<MetaDocument>>,
    pending: Option<PendingFetch>,
}

impl CacheEntry {
    fn fresh(&self) -> Option<Arc<MetaDocument>> {
        match (&self.data, self.expires) {
            (Some(data), Some(expires)) if expires >= Instant::now() => Some(Arc::clone(data)),
            _ => None,
        }
    }
}

/// Shared metadata cache in front of a [`RegistryClient`]
#[derive(Clone)]
pub struct MetaCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    client: RegistryClient,
    ttl: Duration,
    entries: DashMap<String, CacheEntry>,
}

impl MetaCache {
    /// Create a cache with the standard 60-second freshness window
    #[must_use]
    pub fn new(client: RegistryClient) -> Self {
        Self::with_ttl(client, META_TTL)
    }

    /// Create a cache with a custom freshness window
    #[must_use]
    pub fn with_ttl(client: RegistryClient, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                client,
                ttl,
                entries: DashMap::new(),
            }),
        }
    }

    /// Fetch the metadata document for `name`.
    ///
    /// Coalesces onto an already pending fetch for the same name, serves
    /// fresh entries without touching the network, and revalidates expired
    /// entries with the previously captured `ETag`.
    ///
    /// # Errors
    ///
    /// Propagates the underlying fetch failure; a failed fetch leaves the
    /// entry untouched, so the next caller retries.
    pub async fn fetch(&self, name: &str) -> Result<Arc<MetaDocument>, Error> {
        let pending = {
            let mut entry = self.inner.entries.entry(name.to_string()).or_default();

            if let Some(pending) = &entry.pending {
                tracing::debug!(name, "joining in-flight metadata fetch");
                pending.clone()
            } else if let Some(data) = entry.fresh() {
                return Ok(data);
            } else {
                // Revalidate only when there is something to revalidate.
                let etag = if entry.data.is_some() {
                    entry.etag.clone()
                } else {
                    None
                };

                let inner = Arc::clone(&self.inner);
                let owned = name.to_string();
                let fetch: PendingFetch =
                    async move { inner.refresh(&owned, etag.as_deref()).await }
                        .boxed()
                        .shared();
                entry.pending = Some(fetch.clone());
                fetch
            }
            // The entry guard drops here; the network wait happens outside
            // any map lock so unrelated names resolve in parallel.
        };

        pending.await
    }
}

impl CacheInner {
    async fn refresh(&self, name: &str, etag: Option<&str>) -> Result<Arc<MetaDocument>, Error> {
        let outcome = self.client.fetch_meta(name, etag).await;

        let mut entry = self.entries.entry(name.to_string()).or_default();
        // Settle the pending slot exactly once, whatever the outcome.
        entry.pending = None;

        match outcome {
            Ok(FetchOutcome::NotModified) => {
                tracing::debug!(name, "registry not modified, serving cached document");
                entry.expires = Some(Instant::now() + self.ttl);
                entry
                    .data
                    .clone()
                    .ok_or_else(|| Error::internal("registry returned 304 without cached data"))
            }
            Ok(FetchOutcome::Modified { doc, etag }) => {
                let data = Arc::new(doc);
                entry.data = Some(Arc::clone(&data));
                entry.etag = etag;
                entry.expires = Some(Instant::now() + self.ttl);
                Ok(data)
            }
            // Failures are not cached; the entry keeps its previous state.
            Err(e) => Err(e),
        }
    }
}
