//! Geocoding port
//!
//! Resolves a free-text place name to a coordinate. Adapters in the
//! infrastructure layer implement this on top of a mapping provider, and may
//! wrap each other (for example a caching decorator around the HTTP adapter).

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Name-to-coordinate lookup
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a place name
    ///
    /// Returns `ApplicationError::LocationNotFound` when the provider has no
    /// match. Transient failures surface as `ProviderUnavailable`/`Timeout`
    /// after the adapter's retries are spent.
    async fn geocode(&self, name: &str) -> Result<Coordinate, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeocodingPort>();
    }

    #[tokio::test]
    async fn mock_returns_configured_coordinate() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_geocode()
            .withf(|name| name == "Bell Tower")
            .returning(|_| Ok(Coordinate::xian_bell_tower()));

        let result = mock.geocode("Bell Tower").await;
        assert_eq!(result, Ok(Coordinate::xian_bell_tower()));
    }
}
