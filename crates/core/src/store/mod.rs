//! SQLite-backed versioned asset store.
//!
//! This module provides the persistent Request→Response cache behind the
//! offline controller, using SQLite with async access via tokio-rusqlite.
//! It supports:
//!
//! - Named cache generations that can coexist until rotation
//! - Per-key upsert semantics (last writer wins)
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheStorage;
pub use entries::{AssetRequest, CachedResponse};
