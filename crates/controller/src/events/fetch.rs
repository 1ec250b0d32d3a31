//! Fetch event: cache-first request resolution.
//!
//! Cached entries are served as-is, with no expiry or revalidation; stale
//! content persists until the generation name is bumped.

use offsite_client::AssetFetcher;
use offsite_core::Error;
use offsite_core::store::{AssetRequest, CacheStorage, CachedResponse};
use url::Url;

/// Where a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedFrom {
    Cache,
    Network,
}

/// A resolved request: the response plus its provenance.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub from: ResolvedFrom,
    pub response: CachedResponse,
}

/// A cache insertion owed to the store after a resolution is returned.
///
/// The caller schedules it so the write never delays the response.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    pub request: AssetRequest,
    pub response: CachedResponse,
}

/// Resolve a request cache-first.
///
/// 1. Look the request up in `generation`; a hit is returned without
///    consulting the network.
/// 2. On a miss, fetch over the network and return the response whatever
///    its status.
/// 3. Only a 200, same-origin, non-redirected response produces a
///    `PendingWrite`; anything opaque, redirected, or non-200 is returned
///    to the caller but never enters the store. Non-GET requests skip the
///    store entirely.
/// 4. A network failure with no cache hit surfaces as the error it is.
pub async fn fetch_impl(
    store: &CacheStorage, fetcher: &dyn AssetFetcher, generation: &str, request: &AssetRequest, url: &Url,
) -> Result<(Resolution, Option<PendingWrite>), Error> {
    if request.method == "GET" {
        match store.match_request(generation, request).await {
            Ok(Some(hit)) => {
                tracing::debug!(url = %request.url, "cache hit");
                return Ok((Resolution { from: ResolvedFrom::Cache, response: hit }, None));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "cache lookup failed, falling back to network");
            }
        }
    }

    let asset = fetcher.fetch(url).await.inspect_err(|e| {
        tracing::warn!(url = %request.url, error = %e, "network fetch failed with no cache hit");
    })?;

    let cached = asset.to_cached();
    let write = (request.method == "GET" && asset.is_cacheable())
        .then(|| PendingWrite { request: request.clone(), response: cached.clone() });

    Ok((Resolution { from: ResolvedFrom::Network, response: cached }, write))
}
