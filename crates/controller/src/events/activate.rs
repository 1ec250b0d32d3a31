//! Activate event: sweep stale cache generations.

use offsite_core::Error;
use offsite_core::store::CacheStorage;

/// Result of an activation sweep.
#[derive(Debug, Clone)]
pub struct ActivateReport {
    /// The generation that stays.
    pub kept: String,
    /// Generations that were deleted.
    pub deleted: Vec<String>,
}

/// Delete every generation other than `current`.
///
/// The sweep is best-effort: a generation that fails to delete is logged
/// and left for the next activation cycle.
pub async fn activate_impl(store: &CacheStorage, current: &str) -> Result<ActivateReport, Error> {
    let names = store.generation_names().await?;

    let mut deleted = Vec::new();
    for name in names {
        if name == current {
            continue;
        }
        match store.delete_generation(&name).await {
            Ok(entries) => {
                tracing::info!(generation = %name, entries, "deleted stale cache generation");
                deleted.push(name);
            }
            Err(e) => {
                tracing::warn!(generation = %name, error = %e, "failed to delete stale generation");
            }
        }
    }

    Ok(ActivateReport { kept: current.to_string(), deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use offsite_core::store::{AssetRequest, CachedResponse};

    fn make_response() -> CachedResponse {
        CachedResponse {
            status: 200,
            content_type: None,
            headers: Vec::new(),
            body: b"x".to_vec(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_activate_sweeps_stale_generations() {
        let store = CacheStorage::open_in_memory().await.unwrap();
        store.open_generation("torquetrend-cache-v1").await.unwrap();
        store.open_generation("torquetrend-cache-v2").await.unwrap();
        store
            .put_response(
                "torquetrend-cache-v1",
                &AssetRequest::get("https://torquetrend.com/"),
                &make_response(),
            )
            .await
            .unwrap();

        let report = activate_impl(&store, "torquetrend-cache-v2").await.unwrap();

        assert_eq!(report.kept, "torquetrend-cache-v2");
        assert_eq!(report.deleted, vec!["torquetrend-cache-v1".to_string()]);
        assert_eq!(store.generation_names().await.unwrap(), vec!["torquetrend-cache-v2".to_string()]);
    }

    #[tokio::test]
    async fn test_activate_keeps_only_current() {
        let store = CacheStorage::open_in_memory().await.unwrap();
        for name in ["a", "b", "site-v3", "c"] {
            store.open_generation(name).await.unwrap();
        }

        let report = activate_impl(&store, "site-v3").await.unwrap();

        assert_eq!(report.deleted.len(), 3);
        assert_eq!(store.generation_names().await.unwrap(), vec!["site-v3".to_string()]);
    }

    #[tokio::test]
    async fn test_activate_with_nothing_to_sweep() {
        let store = CacheStorage::open_in_memory().await.unwrap();
        store.open_generation("site-v1").await.unwrap();

        let report = activate_impl(&store, "site-v1").await.unwrap();

        assert!(report.deleted.is_empty());
        assert_eq!(store.generation_names().await.unwrap(), vec!["site-v1".to_string()]);
    }
}
