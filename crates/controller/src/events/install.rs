//! Install event: warm the cache generation from the precache manifest.

use offsite_client::{AssetFetcher, resolve_asset};
use offsite_core::store::{AssetRequest, CacheStorage};
use offsite_core::Error;
use url::Url;

/// Result of a completed install.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// Generation that was warmed.
    pub generation: String,
    /// Number of manifest assets written.
    pub cached: usize,
}

/// Warm `generation` with every path in the precache manifest.
///
/// The batch is all-or-nothing: every asset is fetched and checked for a
/// success status before anything is written, so a single failed fetch
/// leaves the generation without a partial batch. Re-running for the same
/// generation re-fetches and overwrites every manifest asset.
pub async fn install_impl(
    store: &CacheStorage, fetcher: &dyn AssetFetcher, origin: &Url, generation: &str, precache: &[String],
) -> Result<InstallReport, Error> {
    store.open_generation(generation).await?;
    tracing::debug!(generation, "opened cache generation");

    let mut batch = Vec::with_capacity(precache.len());
    for path in precache {
        let url = resolve_asset(origin, path).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let asset = fetcher.fetch(&url).await.map_err(|e| Error::AssetFetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if asset.status < 200 || asset.status >= 300 {
            return Err(Error::AssetFetch { url: url.to_string(), reason: format!("status {}", asset.status) });
        }

        batch.push((AssetRequest::get(url.as_str()), asset.to_cached()));
    }

    for (request, response) in &batch {
        store.put_response(generation, request, response).await?;
    }

    Ok(InstallReport { generation: generation.to_string(), cached: batch.len() })
}
