//! Application configuration
//!
//! Split into focused sections:
//! - `amap`: provider endpoint, key and timeout
//! - `routing`: matrix mode, metric, visit policy and solver limits
//! - `geocode_cache`: in-memory geocode cache
//! - `retry`: backoff for transient provider failures
//! - `telemetry`: log filter and output format
//!
//! Values are layered: built-in defaults, then `routewise.toml` (or an
//! explicit path), then `ROUTEWISE__SECTION__KEY` environment variables.

mod cache;
mod routing;

use std::path::Path;

use integration_amap::AmapConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use cache::GeocodeCacheConfig;
pub use routing::RoutingConfig;

use crate::{retry::RetryConfig, telemetry::TelemetryConfig};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "routewise";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "ROUTEWISE";

/// Plain key variable honoured when no key is configured otherwise
pub const FALLBACK_KEY_VAR: &str = "AMAP_KEY";

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub amap: AmapConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub geocode_cache: GeocodeCacheConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from the optional file and the environment
    ///
    /// With `path` the file must exist; without it `routewise.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(key) = std::env::var(FALLBACK_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
        {
            builder = builder.set_default("amap.api_key", key)?;
        }

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        debug!(
            base_url = %config.amap.base_url,
            has_key = config.amap.api_key().is_some(),
            "Configuration loaded"
        );
        config.validate()?;
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.amap
            .validate()
            .and_then(|()| self.routing.validate())
            .and_then(|()| self.geocode_cache.validate())
            .and_then(|()| self.retry.validate())
            .and_then(|()| self.telemetry.validate())
            .map_err(ConfigError::Invalid)
    }
}
