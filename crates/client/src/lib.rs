//! Network client for offsite.
//!
//! This crate provides the HTTP fetch pipeline the offline controller falls
//! back to on a cache miss, plus URL resolution against the site origin and
//! response classification.

pub mod fetch;

pub use fetch::{
    AssetFetcher, FetchClient, FetchConfig, FetchedAsset, ResponseClass, canonicalize, resolve_asset, same_origin,
};
