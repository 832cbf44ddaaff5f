//! AMap adapter - Implements the routing ports using integration_amap
//!
//! Every provider call goes through [`retry`] so transient failures
//! (timeouts, 5xx, rate limits) are retried with backoff before the
//! application layer sees them.

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{
        DirectionsPort, DirectionsQuery, DistancePort, GeocodingPort, LegMeasure, PlaceSearchPort,
        PlaceSearchQuery, PlaceSummary, RouteEstimate,
    },
};
use async_trait::async_trait;
use domain::{Coordinate, TravelMode};
use integration_amap::{AmapClient, AmapError, DistanceType, MAX_DISTANCE_ORIGINS, Poi, RoutePlan};
use tracing::{debug, instrument, warn};

use crate::retry::{RetryConfig, retry};

/// Adapter for the AMap web service
pub struct AmapAdapter {
    client: Arc<dyn AmapClient>,
    retry: RetryConfig,
    default_city: Option<String>,
}

impl std::fmt::Debug for AmapAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmapAdapter")
            .field("client", &"dyn AmapClient")
            .field("retry", &self.retry)
            .field("default_city", &self.default_city)
            .finish()
    }
}

/// What a failed call was about, for error messages
enum CallContext<'a> {
    Place(&'a str),
    Leg(Coordinate, Coordinate),
    Other,
}

impl AmapAdapter {
    #[must_use]
    pub fn new(client: Arc<dyn AmapClient>) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
            default_city: None,
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// City passed to geocoding and transit when a request has none
    #[must_use]
    pub fn with_default_city(mut self, city: Option<String>) -> Self {
        self.default_city = city.filter(|c| !c.trim().is_empty());
        self
    }

    fn map_error(error: AmapError, context: &CallContext<'_>) -> ApplicationError {
        match error {
            AmapError::MissingApiKey => {
                ApplicationError::MissingCredential("AMap API key".to_string())
            },
            AmapError::Timeout { .. } => ApplicationError::Timeout(error.to_string()),
            AmapError::ConnectionFailed(_)
            | AmapError::ServiceUnavailable(_)
            | AmapError::RateLimitExceeded(_) => {
                ApplicationError::ProviderUnavailable(error.to_string())
            },
            AmapError::NotFound(ref query) => match context {
                CallContext::Place(name) => ApplicationError::LocationNotFound((*name).to_string()),
                _ => ApplicationError::LocationNotFound(query.clone()),
            },
            AmapError::NoRoute(ref reason) => match context {
                CallContext::Leg(from, to) => ApplicationError::NoRoute {
                    from: from.to_string(),
                    to: to.to_string(),
                },
                _ => ApplicationError::ProviderRejected(format!("no route: {reason}")),
            },
            AmapError::InvalidKey(ref info) => ApplicationError::InvalidCredential(info.clone()),
            AmapError::QuotaExceeded(_)
            | AmapError::InvalidRequest(_)
            | AmapError::RequestFailed(_)
            | AmapError::ParseError(_)
            | AmapError::Api { .. } => ApplicationError::ProviderRejected(error.to_string()),
        }
    }

    fn estimate_from(plan: RoutePlan) -> RouteEstimate {
        RouteEstimate {
            distance_meters: plan.distance_meters,
            duration_seconds: plan.duration_seconds,
            monetary_cost: plan.cost_yuan,
            description: plan.description,
        }
    }

    fn summary_from(poi: Poi) -> PlaceSummary {
        PlaceSummary {
            name: poi.name,
            address: poi.address,
            coordinate: poi.location,
            rating: poi.rating,
        }
    }
}

#[async_trait]
impl GeocodingPort for AmapAdapter {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Coordinate, ApplicationError> {
        let city = self.default_city.as_deref();
        let found = retry(&self.retry, || self.client.geocode(name, city))
            .await
            .map_err(|e| Self::map_error(e, &CallContext::Place(name)))?;

        debug!(location = %found.location, address = %found.formatted_address, "Resolved place");
        Ok(found.location)
    }
}

#[async_trait]
impl DistancePort for AmapAdapter {
    #[instrument(skip(self, origins), fields(origins = origins.len(), %destination, %mode))]
    async fn distances_to(
        &self,
        origins: &[Coordinate],
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Vec<LegMeasure>, ApplicationError> {
        let kind = DistanceType::for_mode(mode).ok_or_else(|| {
            ApplicationError::InvalidInput(format!("{mode} distances cannot be measured in bulk"))
        })?;

        let mut legs = Vec::with_capacity(origins.len());
        for chunk in origins.chunks(MAX_DISTANCE_ORIGINS) {
            let results = retry(&self.retry, || self.client.distance(chunk, destination, kind))
                .await
                .map_err(|e| Self::map_error(e, &CallContext::Other))?;

            if results.len() != chunk.len() {
                warn!(
                    expected = chunk.len(),
                    got = results.len(),
                    "Distance chunk is incomplete"
                );
            }
            legs.extend(
                results
                    .into_iter()
                    .map(|r| LegMeasure::new(r.distance_meters, r.duration_seconds)),
            );
        }
        Ok(legs)
    }
}

#[async_trait]
impl DirectionsPort for AmapAdapter {
    #[instrument(skip(self, query), fields(mode = %query.mode))]
    async fn directions(&self, query: &DirectionsQuery) -> Result<RouteEstimate, ApplicationError> {
        let (origin, destination) = (query.origin, query.destination);
        let context = CallContext::Leg(origin, destination);

        let plan = match query.mode {
            TravelMode::Driving => {
                retry(&self.retry, || self.client.driving(origin, destination)).await
            },
            TravelMode::Walking => {
                retry(&self.retry, || self.client.walking(origin, destination)).await
            },
            TravelMode::Bicycling => {
                retry(&self.retry, || self.client.bicycling(origin, destination)).await
            },
            TravelMode::Transit => {
                let city = query
                    .city
                    .as_deref()
                    .filter(|c| !c.trim().is_empty())
                    .or(self.default_city.as_deref())
                    .ok_or_else(|| {
                        ApplicationError::InvalidInput(
                            "transit directions require a city".to_string(),
                        )
                    })?;
                retry(&self.retry, || {
                    self.client.transit(origin, destination, city, None)
                })
                .await
            },
        }
        .map_err(|e| Self::map_error(e, &context))?;

        Ok(Self::estimate_from(plan))
    }
}

#[async_trait]
impl PlaceSearchPort for AmapAdapter {
    #[instrument(skip(self, query), fields(keywords = %query.keywords))]
    async fn search_places(
        &self,
        query: &PlaceSearchQuery,
    ) -> Result<Vec<PlaceSummary>, ApplicationError> {
        let city = query.city.as_deref().or(self.default_city.as_deref());
        let pois = retry(&self.retry, || {
            self.client.search_places(&query.keywords, city, query.limit)
        })
        .await
        .map_err(|e| Self::map_error(e, &CallContext::Other))?;

        Ok(pois.into_iter().map(Self::summary_from).collect())
    }
}
