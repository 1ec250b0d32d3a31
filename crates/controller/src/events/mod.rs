//! Lifecycle event implementations.
//!
//! One module per event the controller reacts to: install, activate, fetch.

pub mod activate;
pub mod fetch;
pub mod install;
