//! HTTP fetch pipeline for cache misses and install-time warming.
//!
//! ### URL handling
//! - Asset paths are resolved against the configured site origin
//! - Keys are canonical: lowercased host, no fragment, query preserved
//!
//! ### Classification
//! - Every response is classified as basic, cross-origin, or redirected
//!   relative to the site origin; the caching policy upstream admits only
//!   basic 200 responses
//!
//! ### Limits
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)

pub mod classify;
pub mod url;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use classify::ResponseClass;
pub use url::{UrlError, canonicalize, resolve_asset, same_origin};

use async_trait::async_trait;
use offsite_core::store::CachedResponse;
use offsite_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "offsite/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "offsite/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

/// Response from a fetch operation.
///
/// Carries enough metadata for the caching policy: the status, the
/// classification against the site origin, and the body bytes.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    /// The canonical URL that was requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response headers, flattened for storage
    pub headers: Vec<(String, String)>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Classification against the site origin
    pub class: ResponseClass,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchedAsset {
    /// Whether the caching policy admits this response: status exactly 200
    /// and a basic (same-origin, non-redirected) classification.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.class.is_basic()
    }

    /// Clone into the storable response form.
    pub fn to_cached(&self) -> CachedResponse {
        CachedResponse {
            status: self.status,
            content_type: self.content_type.clone(),
            headers: self.headers.clone(),
            body: self.bytes.to_vec(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Network seam for the offline controller.
///
/// The controller resolves misses through this trait so its caching policy
/// can be exercised without a live origin.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch a canonical URL, returning the response whatever its status.
    ///
    /// Only transport-level failures (DNS, refused connection, timeout) are
    /// errors; HTTP error statuses are returned as responses.
    async fn fetch(&self, url: &Url) -> Result<FetchedAsset, Error>;
}

/// HTTP fetch client for the site's assets.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
    origin: Url,
}

impl FetchClient {
    /// Create a new fetch client scoped to a site origin.
    pub fn new(origin: Url, config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, origin })
    }

    /// Build a client from application configuration.
    pub fn from_app_config(config: &offsite_core::AppConfig) -> Result<Self, Error> {
        let origin = canonicalize(&config.origin).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Self::new(
            origin,
            FetchConfig {
                user_agent: config.user_agent.clone(),
                max_bytes: config.max_bytes,
                timeout: config.timeout(),
                max_redirects: FetchConfig::default().max_redirects,
            },
        )
    }

    /// The site origin this client classifies against.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_inner(&self, url: &Url) -> Result<FetchedAsset, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| Error::Http(format!("network error: {}", e)))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let headers = response.headers().clone();

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::Http(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::Http(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let flat_headers = headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect();

        let class = ResponseClass::of(url, &final_url, &self.origin);
        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} ({}, {:?}) in {}ms ({} bytes)",
            url,
            final_url,
            status,
            class,
            fetch_ms,
            bytes.len()
        );

        Ok(FetchedAsset {
            url: url.clone(),
            final_url,
            status,
            content_type,
            headers: flat_headers,
            bytes,
            class,
            fetch_ms,
        })
    }
}

#[async_trait]
impl AssetFetcher for FetchClient {
    async fn fetch(&self, url: &Url) -> Result<FetchedAsset, Error> {
        self.fetch_inner(url).await
    }
}
