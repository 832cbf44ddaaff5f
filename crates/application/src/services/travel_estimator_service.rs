//! Point-to-point travel estimates for any transport mode

use std::sync::Arc;

use domain::{TravelMode, TravelSegment};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    error::ApplicationError,
    ports::{DirectionsPort, DirectionsQuery},
    services::geocoding_service::GeocodingService,
};

/// A single travel estimate request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub mode: TravelMode,
    /// City scope, required for transit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl TravelRequest {
    #[must_use]
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, mode: TravelMode) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            mode,
            city: None,
        }
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }
}

/// Estimates distance, time and cost between two named places
#[derive(Clone)]
pub struct TravelEstimatorService {
    geocoding: GeocodingService,
    directions: Arc<dyn DirectionsPort>,
    default_city: Option<String>,
}

impl std::fmt::Debug for TravelEstimatorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelEstimatorService")
            .field("geocoding", &self.geocoding)
            .field("default_city", &self.default_city)
            .finish_non_exhaustive()
    }
}

impl TravelEstimatorService {
    #[must_use]
    pub fn new(geocoding: GeocodingService, directions: Arc<dyn DirectionsPort>) -> Self {
        Self {
            geocoding,
            directions,
            default_city: None,
        }
    }

    /// City used for transit requests that do not name one
    #[must_use]
    pub fn with_default_city(mut self, city: Option<String>) -> Self {
        self.default_city = city.filter(|c| !c.trim().is_empty());
        self
    }

    /// Estimate a single trip
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for transit without a city
    /// - `LocationNotFound` when either end cannot be geocoded
    /// - `NoRoute` when the provider has no route for the mode
    #[instrument(skip(self), fields(mode = %request.mode))]
    pub async fn estimate(&self, request: &TravelRequest) -> Result<TravelSegment, ApplicationError> {
        let city = request
            .city
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| self.default_city.clone());
        if request.mode.requires_city() && city.is_none() {
            return Err(ApplicationError::InvalidInput(
                "transit estimates require a city".to_string(),
            ));
        }

        let (origin, destination) = tokio::try_join!(
            self.geocoding.resolve(&request.origin),
            self.geocoding.resolve(&request.destination),
        )?;

        let mut query = DirectionsQuery::new(origin, destination, request.mode);
        query.city = city;

        let estimate = self
            .directions
            .directions(&query)
            .await
            .map_err(|e| match e {
                ApplicationError::NoRoute { .. } => ApplicationError::NoRoute {
                    from: request.origin.trim().to_string(),
                    to: request.destination.trim().to_string(),
                },
                other => other,
            })?;

        debug!(
            distance = estimate.distance_meters,
            duration = estimate.duration_seconds,
            "Travel estimated"
        );

        Ok(TravelSegment {
            origin: request.origin.trim().to_string(),
            destination: request.destination.trim().to_string(),
            mode: request.mode,
            distance_meters: estimate.distance_meters,
            duration_seconds: estimate.duration_seconds,
            monetary_cost: estimate.monetary_cost,
            route_description: estimate.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use domain::Coordinate;

    use super::*;
    use crate::ports::{MockDirectionsPort, MockGeocodingPort, RouteEstimate};

    fn geocoder() -> GeocodingService {
        let mut mock = MockGeocodingPort::new();
        mock.expect_geocode().returning(|name| match name {
            "Bell Tower" => Ok(Coordinate::xian_bell_tower()),
            "Big Wild Goose Pagoda" => Ok(Coordinate::big_wild_goose_pagoda()),
            other => Err(ApplicationError::LocationNotFound(other.to_string())),
        });
        GeocodingService::new(Arc::new(mock))
    }

    fn transit_estimate() -> RouteEstimate {
        RouteEstimate {
            distance_meters: 5_400,
            duration_seconds: 1_680,
            monetary_cost: Some(2.0),
            description: "地铁2号线 → 地铁4号线".to_string(),
        }
    }

    #[tokio::test]
    async fn transit_estimate_carries_fare_and_lines() {
        let mut directions = MockDirectionsPort::new();
        directions
            .expect_directions()
            .withf(|q| q.mode == TravelMode::Transit && q.city.as_deref() == Some("西安"))
            .returning(|_| Ok(transit_estimate()));
        let service = TravelEstimatorService::new(geocoder(), Arc::new(directions));

        let request = TravelRequest::new("Bell Tower", "Big Wild Goose Pagoda", TravelMode::Transit)
            .with_city("西安");
        let segment = service.estimate(&request).await.expect("estimate");

        assert_eq!(segment.mode, TravelMode::Transit);
        assert_eq!(segment.distance_meters, 5_400);
        assert_eq!(segment.monetary_cost, Some(2.0));
        assert_eq!(segment.route_description, "地铁2号线 → 地铁4号线");
    }

    #[tokio::test]
    async fn transit_without_city_is_rejected_before_geocoding() {
        let mut geocoding = MockGeocodingPort::new();
        geocoding.expect_geocode().times(0);
        let mut directions = MockDirectionsPort::new();
        directions.expect_directions().times(0);
        let service = TravelEstimatorService::new(
            GeocodingService::new(Arc::new(geocoding)),
            Arc::new(directions),
        );

        let request = TravelRequest::new("Bell Tower", "Big Wild Goose Pagoda", TravelMode::Transit);
        let err = service.estimate(&request).await.expect_err("no city");
        assert!(matches!(err, ApplicationError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn default_city_fills_transit_requests() {
        let mut directions = MockDirectionsPort::new();
        directions
            .expect_directions()
            .withf(|q| q.city.as_deref() == Some("西安"))
            .returning(|_| Ok(transit_estimate()));
        let service = TravelEstimatorService::new(geocoder(), Arc::new(directions))
            .with_default_city(Some("西安".to_string()));

        let request = TravelRequest::new("Bell Tower", "Big Wild Goose Pagoda", TravelMode::Transit);
        assert!(service.estimate(&request).await.is_ok());
    }

    #[tokio::test]
    async fn no_route_is_distinct_from_success() {
        let mut directions = MockDirectionsPort::new();
        directions.expect_directions().returning(|_| {
            Err(ApplicationError::NoRoute {
                from: "108.947040,34.259430".into(),
                to: "108.964177,34.218490".into(),
            })
        });
        let service = TravelEstimatorService::new(geocoder(), Arc::new(directions))
            .with_default_city(Some("西安".to_string()));

        let request = TravelRequest::new("Bell Tower", "Big Wild Goose Pagoda", TravelMode::Transit);
        let err = service.estimate(&request).await.expect_err("no route");
        assert_eq!(
            err,
            ApplicationError::NoRoute {
                from: "Bell Tower".into(),
                to: "Big Wild Goose Pagoda".into()
            }
        );
    }

    #[tokio::test]
    async fn unknown_destination_is_not_found() {
        let mut directions = MockDirectionsPort::new();
        directions.expect_directions().times(0);
        let service = TravelEstimatorService::new(geocoder(), Arc::new(directions));

        let request = TravelRequest::new("Bell Tower", "Atlantis", TravelMode::Driving);
        let err = service.estimate(&request).await.expect_err("not found");
        assert_eq!(err, ApplicationError::LocationNotFound("Atlantis".into()));
    }

    #[tokio::test]
    async fn walking_needs_no_city() {
        let mut directions = MockDirectionsPort::new();
        directions.expect_directions().returning(|q| {
            assert!(q.city.is_none());
            Ok(RouteEstimate {
                distance_meters: 4_900,
                duration_seconds: 3_900,
                monetary_cost: Some(0.0),
                description: String::new(),
            })
        });
        let service = TravelEstimatorService::new(geocoder(), Arc::new(directions));

        let request = TravelRequest::new("Bell Tower", "Big Wild Goose Pagoda", TravelMode::Walking);
        let segment = service.estimate(&request).await.expect("estimate");
        assert_eq!(segment.duration_minutes(), 65);
        assert_eq!(segment.monetary_cost, Some(0.0));
    }
}
