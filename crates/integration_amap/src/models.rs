//! AMap data models
//!
//! Typed results handed out by [`crate::AmapClient`]. Raw payload shapes
//! stay private to the crate.

use domain::{Coordinate, TravelMode};
use serde::{Deserialize, Serialize};

/// Best geocoding match for an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    /// Address as normalised by the provider
    pub formatted_address: String,
    pub location: Coordinate,
    /// Match granularity, e.g. `"兴趣点"` or `"道路"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Measurement kind for the `/v3/distance` endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceType {
    /// Great-circle distance, no routing
    Straight,
    Driving,
    Walking,
}

impl DistanceType {
    /// Value of the `type` query parameter
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Straight => "0",
            Self::Driving => "1",
            Self::Walking => "3",
        }
    }

    /// Bulk-measurable kind for a travel mode, if there is one
    #[must_use]
    pub const fn for_mode(mode: TravelMode) -> Option<Self> {
        match mode {
            TravelMode::Driving => Some(Self::Driving),
            TravelMode::Walking => Some(Self::Walking),
            TravelMode::Transit | TravelMode::Bicycling => None,
        }
    }
}

/// One origin's entry in a distance response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// Zero-based position of the origin in the request
    pub origin_index: usize,
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

/// First route plan returned by a directions endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    /// Money spent on the trip in yuan (tolls or fare), when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_yuan: Option<f64>,
    /// Road or line names joined with `" → "`
    pub description: String,
}

/// Point-of-interest search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<Coordinate>,
    pub rating: Option<f32>,
}
