//! Cache entry operations.
//!
//! A cache generation is a named set of Request→Response pairs. Entries are
//! keyed by (generation, method, url); writes are upserts, so the last
//! writer for a given key wins.

use super::connection::CacheStorage;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Key side of a cache entry: the request that produced the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRequest {
    pub method: String,
    pub url: String,
}

impl AssetRequest {
    /// Build a request key with an explicit method.
    pub fn new(method: &str, url: impl Into<String>) -> Self {
        Self { method: method.to_ascii_uppercase(), url: url.into() }
    }

    /// Build a GET request key, the common case for static assets.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }
}

/// Value side of a cache entry: the stored response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub fetched_at: String,
}

impl CacheStorage {
    /// Create a cache generation if it doesn't exist yet.
    ///
    /// Opening an existing generation is a no-op; its entries are kept.
    pub async fn open_generation(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
                    params![name, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite the response stored for a request.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist,
    /// replaces the stored response if it does.
    pub async fn put_response(
        &self, generation: &str, request: &AssetRequest, response: &CachedResponse,
    ) -> Result<(), Error> {
        let generation = generation.to_string();
        let request = request.clone();
        let response = response.clone();
        let headers_json = serde_json::to_string(&response.headers)
            .map_err(|e| Error::InvalidInput(format!("failed to serialize headers: {e}")))?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO assets (
                        generation, method, url, status, content_type, headers_json, body, fetched_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(generation, method, url) DO UPDATE SET
                        status = excluded.status,
                        content_type = excluded.content_type,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        fetched_at = excluded.fetched_at",
                    params![
                        &generation,
                        &request.method,
                        &request.url,
                        response.status,
                        &response.content_type,
                        &headers_json,
                        &response.body,
                        &response.fetched_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up the stored response for a request.
    ///
    /// Returns None on a cache miss.
    pub async fn match_request(
        &self, generation: &str, request: &AssetRequest,
    ) -> Result<Option<CachedResponse>, Error> {
        let generation = generation.to_string();
        let request = request.clone();
        self.conn
            .call(move |conn| -> Result<Option<CachedResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT status, content_type, headers_json, body, fetched_at
                     FROM assets WHERE generation = ?1 AND method = ?2 AND url = ?3",
                )?;

                let result = stmt.query_row(params![generation, request.method, request.url], |row| {
                    let headers_json: Option<String> = row.get(2)?;
                    Ok(CachedResponse {
                        status: row.get(0)?,
                        content_type: row.get(1)?,
                        headers: headers_json
                            .and_then(|j| serde_json::from_str(&j).ok())
                            .unwrap_or_default(),
                        body: row.get(3)?,
                        fetched_at: row.get(4)?,
                    })
                });

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// List every cache generation known to the store.
    pub async fn generation_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM generations ORDER BY created_at, name")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a generation and all of its entries.
    ///
    /// Returns the number of entries that were removed.
    pub async fn delete_generation(&self, name: &str) -> Result<u64, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM assets WHERE generation = ?1",
                    params![name],
                    |row| row.get(0),
                )?;
                conn.execute("DELETE FROM generations WHERE name = ?1", params![name])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries stored under a generation.
    pub async fn entry_count(&self, generation: &str) -> Result<u64, Error> {
        let generation = generation.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM assets WHERE generation = ?1",
                    params![generation],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
