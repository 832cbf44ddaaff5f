//! Cached geocoding adapter - Decorator that adds caching to any `GeocodingPort`
//!
//! Place names resolve to the same coordinate for the lifetime of the
//! process, so repeated names in one request (or across requests) hit the
//! provider once. Failures are never cached.

use std::sync::Arc;

use application::{error::ApplicationError, ports::GeocodingPort};
use async_trait::async_trait;
use domain::Coordinate;
use tracing::instrument;

use crate::cache::GeocodeCache;

/// Caching decorator for geocoding ports
pub struct CachedGeocodingAdapter {
    inner: Arc<dyn GeocodingPort>,
    cache: Arc<GeocodeCache>,
}

impl std::fmt::Debug for CachedGeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedGeocodingAdapter")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl CachedGeocodingAdapter {
    pub fn new(inner: Arc<dyn GeocodingPort>, cache: Arc<GeocodeCache>) -> Self {
        Self { inner, cache }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<GeocodeCache> {
        &self.cache
    }
}

#[async_trait]
impl GeocodingPort for CachedGeocodingAdapter {
    #[instrument(skip(self), level = "debug")]
    async fn geocode(&self, name: &str) -> Result<Coordinate, ApplicationError> {
        self.cache
            .get_or_try_insert_with(name, self.inner.geocode(name))
            .await
    }
}
