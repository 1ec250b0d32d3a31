//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (OFFSITE_*)
//! 2. TOML config file (if OFFSITE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (OFFSITE_*)
/// 2. TOML config file (if OFFSITE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name of the active cache generation.
    ///
    /// Bump this when the asset list changes; stale generations are swept
    /// the next time the controller activates.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Site-relative asset paths warmed into the cache at install time.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    /// Origin the site is served from.
    ///
    /// Manifest paths are resolved against it, and it is the same-origin
    /// boundary for deciding which fetched responses may be cached.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path to the SQLite asset store.
    ///
    /// Set via OFFSITE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_cache_name() -> String {
    "torquetrend-cache-v2".into()
}

fn default_precache() -> Vec<String> {
    [
        "/",
        "/index.html",
        "/styles.css",
        "/scripts.js",
        "/particles.json",
        "/manifest.json",
        "/f1.mp4.jpg",
        "/lithium-mine.jpg",
        "/waymo.jpg",
        "/car-charging.jpg",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_origin() -> String {
    "https://torquetrend.com".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./offsite-cache.sqlite")
}

fn default_user_agent() -> String {
    "offsite/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_name: default_cache_name(),
            precache: default_precache(),
            origin: default_origin(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `OFFSITE_`
    /// 2. TOML file from `OFFSITE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("OFFSITE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("OFFSITE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
