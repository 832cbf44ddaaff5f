//! AMap (Gaode) integration for Routewise
//!
//! Thin async client over the [AMap Web Service API](https://lbs.amap.com/api/webservice/summary):
//! geocoding, many-to-one distance measurement, per-mode directions and
//! point-of-interest text search.
//!
//! # Architecture
//!
//! [`AmapClient`] defines the operations the rest of the workspace needs and
//! [`AmapHttpClient`] implements them with `reqwest`. Provider payloads are
//! decoded leniently (the API sends `[]` for empty strings and numbers as
//! strings) and converted into the typed models in this crate before they
//! leave it. Provider status codes are classified into [`AmapError`], whose
//! [`AmapError::is_retryable`] drives the retry policy upstream.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_amap::{AmapClient, AmapConfig, AmapHttpClient, DistanceType};
//!
//! let config = AmapConfig::for_testing("http://localhost:8080");
//! let client = AmapHttpClient::new(&config)?;
//!
//! let bell_tower = client.geocode("西安钟楼", Some("西安")).await?;
//! let column = client
//!     .distance(&[bell_tower.location], bell_tower.location, DistanceType::Driving)
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod models;
mod wire;

pub use client::{AmapClient, AmapHttpClient, MAX_DISTANCE_ORIGINS};
pub use config::AmapConfig;
pub use error::AmapError;
pub use models::{DistanceResult, DistanceType, GeocodeMatch, Poi, RoutePlan};
