//! AMap web service client
//!
//! Every request carries the `key` parameter and goes through
//! [`AmapHttpClient::get`], which maps transport failures and HTTP statuses
//! into [`AmapError`] before the payload is decoded.

use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    config::AmapConfig,
    error::AmapError,
    models::{DistanceResult, DistanceType, GeocodeMatch, Poi, RoutePlan},
    wire::{
        BicyclingResponse, DistanceResponse, GeocodeResponse, PathCost, PlaceResponse,
        RouteResponse, TransitResponse, decode,
    },
};

/// Largest origin list the distance endpoint accepts in one request
pub const MAX_DISTANCE_ORIGINS: usize = 100;

/// Largest page the place search endpoint returns
const MAX_PLACE_PAGE: u8 = 25;

/// Operations Routewise needs from AMap
#[async_trait]
pub trait AmapClient: Send + Sync {
    /// Resolve an address to its best match
    async fn geocode(&self, address: &str, city: Option<&str>) -> Result<GeocodeMatch, AmapError>;

    /// Measure from every origin to one destination
    async fn distance(
        &self,
        origins: &[Coordinate],
        destination: Coordinate,
        kind: DistanceType,
    ) -> Result<Vec<DistanceResult>, AmapError>;

    /// Driving route; cost is the toll total
    async fn driving(&self, origin: Coordinate, destination: Coordinate)
    -> Result<RoutePlan, AmapError>;

    async fn walking(&self, origin: Coordinate, destination: Coordinate)
    -> Result<RoutePlan, AmapError>;

    async fn bicycling(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutePlan, AmapError>;

    /// Integrated public transit; cost is the fare of the first plan
    async fn transit(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        city: &str,
        destination_city: Option<&str>,
    ) -> Result<RoutePlan, AmapError>;

    /// Keyword search, limited to `city` when given
    async fn search_places(
        &self,
        keywords: &str,
        city: Option<&str>,
        limit: u8,
    ) -> Result<Vec<Poi>, AmapError>;
}

/// `reqwest`-based [`AmapClient`]
#[derive(Debug)]
pub struct AmapHttpClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    timeout_secs: u64,
}

impl AmapHttpClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when no key is configured and
    /// `ConnectionFailed` if the HTTP client cannot be initialized.
    pub fn new(config: &AmapConfig) -> Result<Self, AmapError> {
        let api_key = config.require_api_key()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("routewise/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AmapError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Issue a GET and decode the JSON body
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, AmapError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "AMap request");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AmapError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else {
                    AmapError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AmapError::RateLimitExceeded(format!("HTTP {status}")));
        }
        if status.is_server_error() {
            return Err(AmapError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(AmapError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                AmapError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                AmapError::ParseError(e.to_string())
            }
        })?;

        decode(&body)
    }

    fn endpoints(origin: Coordinate, destination: Coordinate) -> Vec<(&'static str, String)> {
        vec![
            ("origin", origin.to_provider_string()),
            ("destination", destination.to_provider_string()),
        ]
    }
}

#[async_trait]
impl AmapClient for AmapHttpClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str, city: Option<&str>) -> Result<GeocodeMatch, AmapError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AmapError::InvalidRequest(
                "address must not be empty".to_string(),
            ));
        }

        let mut params = vec![("address", address.to_string())];
        if let Some(city) = city.filter(|c| !c.trim().is_empty()) {
            params.push(("city", city.to_string()));
        }

        let response: GeocodeResponse = self.get("/v3/geocode/geo", &params).await?;
        let found = response
            .into_match(address)
            .inspect_err(|e| debug!(error = %e, "Geocoding failed"))?;

        debug!(location = %found.location, "Geocoded");
        Ok(found)
    }

    #[instrument(skip(self, origins), fields(origins = origins.len(), %destination, ?kind))]
    async fn distance(
        &self,
        origins: &[Coordinate],
        destination: Coordinate,
        kind: DistanceType,
    ) -> Result<Vec<DistanceResult>, AmapError> {
        if origins.is_empty() {
            return Err(AmapError::InvalidRequest(
                "at least one origin is required".to_string(),
            ));
        }
        if origins.len() > MAX_DISTANCE_ORIGINS {
            return Err(AmapError::InvalidRequest(format!(
                "at most {MAX_DISTANCE_ORIGINS} origins per request, got {}",
                origins.len()
            )));
        }

        let params = [
            ("origins", Coordinate::join(origins)),
            ("destination", destination.to_provider_string()),
            ("type", kind.as_param().to_string()),
        ];

        let response: DistanceResponse = self.get("/v3/distance", &params).await?;
        let results = response.into_results(origins.len())?;

        if results.len() != origins.len() {
            warn!(
                expected = origins.len(),
                got = results.len(),
                "Distance response is short"
            );
        }
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn driving(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutePlan, AmapError> {
        let mut params = Self::endpoints(origin, destination);
        params.push(("extensions", "base".to_string()));

        let response: RouteResponse = self.get("/v3/direction/driving", &params).await?;
        response.into_plan(PathCost::Tolls)
    }

    #[instrument(skip(self))]
    async fn walking(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutePlan, AmapError> {
        let params = Self::endpoints(origin, destination);
        let response: RouteResponse = self.get("/v3/direction/walking", &params).await?;
        response.into_plan(PathCost::Free)
    }

    #[instrument(skip(self))]
    async fn bicycling(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutePlan, AmapError> {
        let params = Self::endpoints(origin, destination);
        let response: BicyclingResponse = self.get("/v4/direction/bicycling", &params).await?;
        response.into_plan()
    }

    #[instrument(skip(self))]
    async fn transit(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        city: &str,
        destination_city: Option<&str>,
    ) -> Result<RoutePlan, AmapError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AmapError::InvalidRequest(
                "transit requests require a city".to_string(),
            ));
        }

        let mut params = Self::endpoints(origin, destination);
        params.push(("city", city.to_string()));
        if let Some(cityd) = destination_city.filter(|c| !c.trim().is_empty()) {
            params.push(("cityd", cityd.to_string()));
        }
        params.push(("extensions", "base".to_string()));

        let response: TransitResponse = self
            .get("/v3/direction/transit/integrated", &params)
            .await?;
        let plan = response.into_plan()?;
        debug!(cost = ?plan.cost_yuan, lines = %plan.description, "Transit plan");
        Ok(plan)
    }

    #[instrument(skip(self))]
    async fn search_places(
        &self,
        keywords: &str,
        city: Option<&str>,
        limit: u8,
    ) -> Result<Vec<Poi>, AmapError> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Err(AmapError::InvalidRequest(
                "keywords must not be empty".to_string(),
            ));
        }
        let limit = limit.clamp(1, MAX_PLACE_PAGE);

        let mut params = vec![("keywords", keywords.to_string())];
        if let Some(city) = city.filter(|c| !c.trim().is_empty()) {
            params.push(("city", city.to_string()));
            params.push(("citylimit", "true".to_string()));
        }
        params.extend([
            ("offset", limit.to_string()),
            ("page", "1".to_string()),
            ("extensions", "all".to_string()),
        ]);

        let response: PlaceResponse = self.get("/v3/place/text", &params).await?;
        let pois = response.into_pois(usize::from(limit))?;
        debug!(count = pois.len(), "Places found");
        Ok(pois)
    }
}
