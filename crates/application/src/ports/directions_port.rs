//! Point-to-point directions port
//!
//! Each transport mode has its own provider endpoint and response shape.
//! Adapters normalise all of them into a [`RouteEstimate`].

use async_trait::async_trait;
use domain::{Coordinate, TravelMode};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Request for a single route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsQuery {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
    /// Required for transit, ignored otherwise
    pub city: Option<String>,
}

impl DirectionsQuery {
    #[must_use]
    pub const fn new(origin: Coordinate, destination: Coordinate, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
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

/// Normalised route estimate for any mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    /// Tolls (driving) or fare (transit); zero for walking and cycling
    pub monetary_cost: Option<f64>,
    /// Roads or lines used, in order
    pub description: String,
}

/// Directions lookup
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectionsPort: Send + Sync {
    /// Best route for the query
    ///
    /// Returns `ApplicationError::NoRoute` when the provider finds none,
    /// never a zero-length success.
    async fn directions(&self, query: &DirectionsQuery) -> Result<RouteEstimate, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn DirectionsPort>();
    }

    #[test]
    fn query_builder_sets_city() {
        let query = DirectionsQuery::new(
            Coordinate::xian_bell_tower(),
            Coordinate::big_wild_goose_pagoda(),
            TravelMode::Transit,
        )
        .with_city("西安");
        assert_eq!(query.city.as_deref(), Some("西安"));
    }
}
