//! Map tool facade
//!
//! The surface an orchestrating agent calls: resolve a name, estimate a
//! trip, optimize a route, search for places. Each operation is available
//! as a typed method and through [`MapTools::dispatch`], which takes a
//! serialized [`ToolCall`] and always answers with a [`ToolReply`].

use std::sync::Arc;

use domain::{Coordinate, CostMetric, TravelMode, TravelSegment, VisitPolicy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{PlaceSearchPort, PlaceSearchQuery, PlaceSummary},
    services::{
        geocoding_service::GeocodingService,
        result_formatter::{
            CoordinateToolOutput, RouteToolOutput, format_coordinate, format_failure,
            format_places, format_route, format_segment,
        },
        route_optimizer_service::{OptimizedRoute, RouteOptimizerService, RouteRequest},
        travel_estimator_service::{TravelEstimatorService, TravelRequest},
    },
};

/// Destinations given either as a list or as one delimited string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DestinationList {
    List(Vec<String>),
    Text(String),
}

impl DestinationList {
    /// Individual names, trimmed, blanks removed
    ///
    /// Text is split on ASCII and full-width commas.
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        let raw = match self {
            Self::List(names) => names,
            Self::Text(text) => text
                .split([',', '，'])
                .map(ToString::to_string)
                .collect(),
        };
        raw.into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// A tool invocation as received from the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCall {
    ResolveCoordinates {
        name: String,
    },
    EstimateTravel {
        origin: String,
        destination: String,
        #[serde(default)]
        mode: TravelMode,
        #[serde(default)]
        city: Option<String>,
    },
    OptimizeRoute {
        origin: String,
        destinations: DestinationList,
        #[serde(default)]
        mode: Option<TravelMode>,
        #[serde(default)]
        metric: Option<CostMetric>,
        #[serde(default)]
        policy: Option<VisitPolicy>,
    },
    SearchPlaces {
        keywords: String,
        #[serde(default)]
        city: Option<String>,
    },
}

impl ToolCall {
    /// Tool name as used on the wire
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ResolveCoordinates { .. } => "resolve_coordinates",
            Self::EstimateTravel { .. } => "estimate_travel",
            Self::OptimizeRoute { .. } => "optimize_route",
            Self::SearchPlaces { .. } => "search_places",
        }
    }
}

/// Result of a tool call: human text plus structured data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReply {
    pub success: bool,
    pub text: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl ToolReply {
    fn ok(text: String, data: Value) -> Self {
        Self {
            success: true,
            text,
            data,
            error_code: None,
        }
    }

    fn failure(error: &ApplicationError) -> Self {
        Self {
            success: false,
            text: format_failure(error),
            data: Value::Null,
            error_code: Some(error.code().to_string()),
        }
    }
}

/// Entry point for all map tools
#[derive(Clone)]
pub struct MapTools {
    geocoding: GeocodingService,
    travel: TravelEstimatorService,
    routes: RouteOptimizerService,
    places: Arc<dyn PlaceSearchPort>,
    default_city: Option<String>,
}

impl std::fmt::Debug for MapTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapTools")
            .field("routes", &self.routes)
            .field("default_city", &self.default_city)
            .finish_non_exhaustive()
    }
}

impl MapTools {
    #[must_use]
    pub fn new(
        geocoding: GeocodingService,
        travel: TravelEstimatorService,
        routes: RouteOptimizerService,
        places: Arc<dyn PlaceSearchPort>,
    ) -> Self {
        Self {
            geocoding,
            travel,
            routes,
            places,
            default_city: None,
        }
    }

    /// City used for place searches that do not name one
    #[must_use]
    pub fn with_default_city(mut self, city: Option<String>) -> Self {
        self.default_city = city;
        self
    }

    pub async fn resolve_coordinates(&self, name: &str) -> Result<Coordinate, ApplicationError> {
        self.geocoding.resolve(name).await
    }

    pub async fn estimate_travel(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
        city: Option<&str>,
    ) -> Result<TravelSegment, ApplicationError> {
        let mut request = TravelRequest::new(origin, destination, mode);
        request.city = city.map(ToString::to_string);
        self.travel.estimate(&request).await
    }

    /// Optimize with the configured mode, metric and visit policy
    pub async fn optimize_route(
        &self,
        origin: &str,
        destinations: &[String],
        cancel: &CancellationToken,
    ) -> Result<OptimizedRoute, ApplicationError> {
        self.routes
            .optimize(&RouteRequest::new(origin, destinations.to_vec()), cancel)
            .await
    }

    pub async fn optimize(
        &self,
        request: &RouteRequest,
        cancel: &CancellationToken,
    ) -> Result<OptimizedRoute, ApplicationError> {
        self.routes.optimize(request, cancel).await
    }

    pub async fn search_places(
        &self,
        keywords: &str,
        city: Option<&str>,
    ) -> Result<Vec<PlaceSummary>, ApplicationError> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "search keywords must not be empty".to_string(),
            ));
        }
        let mut query = PlaceSearchQuery::new(keywords);
        query.city = city
            .map(ToString::to_string)
            .or_else(|| self.default_city.clone());
        self.places.search_places(&query).await
    }

    /// Run a tool call and render the outcome
    ///
    /// Errors are reported inside the reply, never returned. Cancelling
    /// `cancel` abandons whatever provider calls are still in flight.
    #[instrument(skip(self, call, cancel), fields(tool = call.name()))]
    pub async fn dispatch(&self, call: ToolCall, cancel: &CancellationToken) -> ToolReply {
        let work = self.run(call, cancel);
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ApplicationError::Cancelled),
            result = work => result,
        };

        match result {
            Ok(reply) => {
                info!("Tool call succeeded");
                reply
            },
            Err(e) => {
                warn!(error = %e, code = e.code(), "Tool call failed");
                ToolReply::failure(&e)
            },
        }
    }

    async fn run(
        &self,
        call: ToolCall,
        cancel: &CancellationToken,
    ) -> Result<ToolReply, ApplicationError> {
        match call {
            ToolCall::ResolveCoordinates { name } => {
                self.resolve_coordinates(&name).await.and_then(|c| {
                    let data = to_value(&CoordinateToolOutput::new(name.trim(), &c))?;
                    Ok(ToolReply::ok(format_coordinate(name.trim(), &c), data))
                })
            },
            ToolCall::EstimateTravel {
                origin,
                destination,
                mode,
                city,
            } => self
                .estimate_travel(&origin, &destination, mode, city.as_deref())
                .await
                .and_then(|segment| {
                    Ok(ToolReply::ok(format_segment(&segment), to_value(&segment)?))
                }),
            ToolCall::OptimizeRoute {
                origin,
                destinations,
                mode,
                metric,
                policy,
            } => {
                let request = RouteRequest {
                    origin,
                    destinations: destinations.into_names(),
                    mode,
                    metric,
                    policy,
                };
                self.optimize(&request, cancel).await.and_then(|route| {
                    let data = to_value(&RouteToolOutput::from(&route))?;
                    Ok(ToolReply::ok(format_route(&route), data))
                })
            },
            ToolCall::SearchPlaces { keywords, city } => self
                .search_places(&keywords, city.as_deref())
                .await
                .and_then(|places| Ok(ToolReply::ok(format_places(&places), to_value(&places)?))),
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ApplicationError> {
    serde_json::to_value(value).map_err(|e| ApplicationError::Internal(e.to_string()))
}
