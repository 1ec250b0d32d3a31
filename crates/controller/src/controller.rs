//! The offline cache controller and its lifecycle state machine.

use std::sync::Arc;

use offsite_client::{AssetFetcher, canonicalize, resolve_asset};
use offsite_core::store::{AssetRequest, CacheStorage};
use offsite_core::{AppConfig, Error};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use url::Url;

use crate::clients::ClientControl;
use crate::events::activate::{ActivateReport, activate_impl};
use crate::events::fetch::fetch_impl;
use crate::events::install::{InstallReport, install_impl};

pub use crate::events::fetch::{Resolution, ResolvedFrom};

/// Lifecycle phase of a controller.
///
/// A new deployment starts a fresh controller at `Uninstalled`; the
/// generation it replaces stays `Active` until the newcomer's activation
/// sweeps its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Uninstalled,
    Installing,
    Installed,
    Activating,
    Active,
}

/// Owns one cache generation and reacts to the three lifecycle events:
/// install (warm the store), activate (sweep stale generations), and
/// fetch (cache-first resolution).
pub struct OfflineCacheController {
    config: AppConfig,
    origin: Url,
    storage: CacheStorage,
    fetcher: Arc<dyn AssetFetcher>,
    clients: Arc<dyn ClientControl>,
    phase: LifecyclePhase,
    writes: Mutex<JoinSet<()>>,
}

impl OfflineCacheController {
    /// Build a controller over an opened store.
    pub fn new(
        config: AppConfig, storage: CacheStorage, fetcher: Arc<dyn AssetFetcher>, clients: Arc<dyn ClientControl>,
    ) -> Result<Self, Error> {
        let origin = canonicalize(&config.origin).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self {
            config,
            origin,
            storage,
            fetcher,
            clients,
            phase: LifecyclePhase::Uninstalled,
            writes: Mutex::new(JoinSet::new()),
        })
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Install: warm the configured generation from the precache manifest.
    ///
    /// Signals skip-waiting up front, mirroring the deployment flow where a
    /// new generation never waits for open clients to drain. A failed batch
    /// aborts the install and leaves the previously active generation
    /// untouched.
    pub async fn install(&mut self) -> Result<InstallReport, Error> {
        self.phase = LifecyclePhase::Installing;
        self.clients.skip_waiting();

        match install_impl(
            &self.storage,
            self.fetcher.as_ref(),
            &self.origin,
            &self.config.cache_name,
            &self.config.precache,
        )
        .await
        {
            Ok(report) => {
                tracing::info!(generation = %report.generation, cached = report.cached, "install complete");
                self.phase = LifecyclePhase::Installed;
                Ok(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "install failed");
                self.phase = LifecyclePhase::Uninstalled;
                Err(e)
            }
        }
    }

    /// Activate: sweep stale generations, then take over open clients.
    ///
    /// Best-effort by contract: sweep errors are logged and never block the
    /// claim, so the controller always ends up `Active`.
    pub async fn activate(&mut self) -> ActivateReport {
        self.phase = LifecyclePhase::Activating;

        let report = match activate_impl(&self.storage, &self.config.cache_name).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "cache sweep failed, stale generations may remain");
                ActivateReport { kept: self.config.cache_name.clone(), deleted: Vec::new() }
            }
        };

        self.clients.claim();
        self.phase = LifecyclePhase::Active;
        report
    }

    /// Resolve a request cache-first. Only valid while `Active`.
    ///
    /// `reference` is a site-relative path or an absolute URL. A cacheable
    /// network response is written back in the background; the resolution
    /// is returned without waiting on that write.
    pub async fn resolve(&self, method: &str, reference: &str) -> Result<Resolution, Error> {
        if self.phase != LifecyclePhase::Active {
            return Err(Error::NotActive(format!("{:?}", self.phase)));
        }

        let url = resolve_asset(&self.origin, reference).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let request = AssetRequest::new(method, url.as_str());

        let (resolution, write) =
            fetch_impl(&self.storage, self.fetcher.as_ref(), &self.config.cache_name, &request, &url).await?;

        if let Some(write) = write {
            let store = self.storage.clone();
            let generation = self.config.cache_name.clone();
            let mut writes = self.writes.lock().await;
            writes.spawn(async move {
                if let Err(e) = store.put_response(&generation, &write.request, &write.response).await {
                    tracing::warn!(url = %write.request.url, error = %e, "background cache write failed");
                }
            });
        }

        Ok(resolution)
    }

    /// Wait for outstanding background cache writes to finish.
    pub async fn settle_writes(&self) {
        let mut writes = self.writes.lock().await;
        while writes.join_next().await.is_some() {}
    }
}
