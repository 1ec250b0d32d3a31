//! Unified error types for offsite.

use tokio_rusqlite::rusqlite;

/// Unified error types for the offsite cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty asset path).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The cache store could not be opened.
    #[error("failed to open cache store: {0}")]
    CacheOpen(String),

    /// Database operation failed.
    #[error("cache store error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("cache store migration failed: {0}")]
    MigrationFailed(String),

    /// A manifest asset could not be fetched during the install batch.
    #[error("failed to fetch asset {url}: {reason}")]
    AssetFetch { url: String, reason: String },

    /// Invalid or unresolvable URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Network fetch failed.
    #[error("network error: {0}")]
    Http(String),

    /// A fetch was routed to a controller that has not activated yet.
    #[error("controller is not active: {0}")]
    NotActive(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
