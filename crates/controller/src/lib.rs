//! Offline cache controller for offsite.
//!
//! This crate owns the lifecycle of a cache generation: warming it from the
//! precache manifest (install), sweeping stale generations and taking over
//! open clients (activate), and resolving asset requests cache-first once
//! active (fetch).

pub mod clients;
pub mod controller;
pub mod events;

#[cfg(test)]
pub(crate) mod testutil;

pub use clients::{ClientControl, LoggingClients};
pub use controller::{LifecyclePhase, OfflineCacheController, Resolution, ResolvedFrom};
pub use events::activate::ActivateReport;
pub use events::install::InstallReport;
