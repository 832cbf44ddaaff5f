//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod directions_port;
mod distance_port;
mod geocoding_port;
mod place_search_port;

#[cfg(test)]
pub use directions_port::MockDirectionsPort;
pub use directions_port::{DirectionsPort, DirectionsQuery, RouteEstimate};
#[cfg(test)]
pub use distance_port::MockDistancePort;
pub use distance_port::{DistancePort, LegMeasure};
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use place_search_port::MockPlaceSearchPort;
pub use place_search_port::{DEFAULT_PLACE_LIMIT, PlaceSearchPort, PlaceSearchQuery, PlaceSummary};
