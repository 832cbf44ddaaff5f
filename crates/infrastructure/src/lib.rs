//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the AMap client, adds the
//! geocode cache and retry policy, loads configuration, sets up logging and
//! wires everything into a [`application::MapTools`] facade.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod container;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use cache::{GeocodeCache, GeocodeCacheStats, normalize_place_key};
pub use config::{AppConfig, ConfigError, GeocodeCacheConfig, RoutingConfig};
pub use container::{build_map_tools, build_map_tools_with_client};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
