//! Test doubles shared by the event and controller tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use offsite_client::{AssetFetcher, FetchedAsset, ResponseClass, resolve_asset};
use offsite_core::Error;
use url::Url;

#[derive(Clone)]
struct Canned {
    status: u16,
    body: Vec<u8>,
    class: ResponseClass,
    final_url: Option<Url>,
}

/// Scripted fetcher: canned responses per URL, network errors for
/// everything else, and a call counter to prove when the network was
/// not consulted.
pub(crate) struct StubFetcher {
    origin: Url,
    responses: Mutex<HashMap<String, Canned>>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new(origin: &Url) -> Self {
        Self { origin: origin.clone(), responses: Mutex::new(HashMap::new()), calls: AtomicUsize::new(0) }
    }

    fn insert(&self, url: Url, canned: Canned) {
        self.responses.lock().unwrap().insert(url.to_string(), canned);
    }

    fn url_for(&self, path: &str) -> Url {
        resolve_asset(&self.origin, path).unwrap()
    }

    /// Serve `path` as a 200 same-origin response.
    pub fn ok(&self, path: &str, body: &str) {
        self.status(path, 200, body);
    }

    /// Serve `path` with an explicit status.
    pub fn status(&self, path: &str, status: u16, body: &str) {
        let url = self.url_for(path);
        self.insert(url, Canned { status, body: body.as_bytes().to_vec(), class: ResponseClass::Basic, final_url: None });
    }

    /// Serve `path` as a 200 that was reached through a redirect.
    pub fn redirected(&self, path: &str, target: &str, body: &str) {
        let url = self.url_for(path);
        let final_url = self.url_for(target);
        self.insert(
            url,
            Canned {
                status: 200,
                body: body.as_bytes().to_vec(),
                class: ResponseClass::Redirected,
                final_url: Some(final_url),
            },
        );
    }

    /// Serve an absolute URL on a foreign origin.
    pub fn cross_origin(&self, absolute: &str, body: &str) {
        let url = Url::parse(absolute).unwrap();
        self.insert(
            url,
            Canned { status: 200, body: body.as_bytes().to_vec(), class: ResponseClass::CrossOrigin, final_url: None },
        );
    }

    /// How many times fetch was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedAsset, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let canned = self
            .responses
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::Http(format!("connection refused: {url}")))?;

        Ok(FetchedAsset {
            url: url.clone(),
            final_url: canned.final_url.unwrap_or_else(|| url.clone()),
            status: canned.status,
            content_type: Some("text/plain".to_string()),
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            bytes: canned.body.into(),
            class: canned.class,
            fetch_ms: 1,
        })
    }
}
