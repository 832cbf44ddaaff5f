//! Service wiring
//!
//! Builds the [`MapTools`] facade from an [`AppConfig`]: one AMap client,
//! one adapter serving every port, an optional geocode cache in front of
//! geocoding, and the application services on top.

use std::sync::Arc;

use application::{
    ApplicationError, DistanceMatrixService, GeocodingService, MapTools, RouteOptimizerService,
    TravelEstimatorService,
    ports::{DirectionsPort, DistancePort, GeocodingPort, PlaceSearchPort},
};
use integration_amap::{AmapClient, AmapError, AmapHttpClient};
use tracing::info;

use crate::{
    adapters::{AmapAdapter, CachedGeocodingAdapter},
    cache::GeocodeCache,
    config::AppConfig,
};

/// Build the tool facade backed by the AMap HTTP client
///
/// # Errors
///
/// `MissingCredential` when no API key is configured, `Configuration` when
/// a section is invalid or the HTTP client cannot be created.
pub fn build_map_tools(config: &AppConfig) -> Result<MapTools, ApplicationError> {
    config
        .validate()
        .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

    let client = AmapHttpClient::new(&config.amap).map_err(|e| match e {
        AmapError::MissingApiKey => ApplicationError::MissingCredential(
            "AMap API key (set amap.api_key, ROUTEWISE__AMAP__API_KEY or AMAP_KEY)".to_string(),
        ),
        other => ApplicationError::Configuration(other.to_string()),
    })?;

    Ok(build_map_tools_with_client(config, Arc::new(client)))
}

/// Build the tool facade on top of any [`AmapClient`]
pub fn build_map_tools_with_client(config: &AppConfig, client: Arc<dyn AmapClient>) -> MapTools {
    let default_city = config.amap.default_city.clone();
    let concurrency = config.routing.max_concurrency;

    let adapter = Arc::new(
        AmapAdapter::new(client)
            .with_retry(config.retry.clone())
            .with_default_city(default_city.clone()),
    );

    let geocoder: Arc<dyn GeocodingPort> = if config.geocode_cache.enabled {
        let cache = Arc::new(GeocodeCache::new(config.geocode_cache.max_entries));
        Arc::new(CachedGeocodingAdapter::new(
            Arc::clone(&adapter) as Arc<dyn GeocodingPort>,
            cache,
        ))
    } else {
        Arc::clone(&adapter) as Arc<dyn GeocodingPort>
    };

    let geocoding = GeocodingService::new(geocoder).with_max_concurrency(concurrency);
    let matrix = DistanceMatrixService::new(Arc::clone(&adapter) as Arc<dyn DistancePort>)
        .with_max_concurrency(concurrency);
    let routes = RouteOptimizerService::new(
        geocoding.clone(),
        matrix,
        config.routing.optimizer_config(),
    );
    let travel = TravelEstimatorService::new(
        geocoding.clone(),
        Arc::clone(&adapter) as Arc<dyn DirectionsPort>,
    )
    .with_default_city(default_city.clone());

    info!(
        matrix_mode = %config.routing.matrix_mode,
        metric = %config.routing.metric,
        policy = %config.routing.visit_policy,
        cache = config.geocode_cache.enabled,
        "Map tools ready"
    );

    MapTools::new(
        geocoding,
        travel,
        routes,
        adapter as Arc<dyn PlaceSearchPort>,
    )
    .with_default_city(default_city)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_credential_error() {
        let err = build_map_tools(&AppConfig::default()).unwrap_err();
        assert!(matches!(err, ApplicationError::MissingCredential(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn invalid_section_is_a_configuration_error() {
        let mut config = AppConfig::default();
        config.amap.api_key = Some("k".to_string().into());
        config.amap.base_url = "ftp://restapi.amap.com".to_string();
        let err = build_map_tools(&config).unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[tokio::test]
    async fn builds_with_a_key() {
        let mut config = AppConfig::default();
        config.amap.api_key = Some("k".to_string().into());
        assert!(build_map_tools(&config).is_ok());
    }
}
