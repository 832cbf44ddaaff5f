//! Application services - Use case implementations

pub mod distance_matrix_service;
pub mod geocoding_service;
pub mod map_tools;
pub mod result_formatter;
pub mod route_optimizer_service;
pub mod travel_estimator_service;

pub use distance_matrix_service::{DistanceMatrixService, MATRIX_MODES};
pub use geocoding_service::{DEFAULT_MAX_CONCURRENCY, GeocodingService, ResolvedPlaces};
pub use map_tools::{DestinationList, MapTools, ToolCall, ToolReply};
pub use result_formatter::{CoordinateToolOutput, RouteToolOutput};
pub use route_optimizer_service::{
    OptimizedRoute, RouteOptimizerConfig, RouteOptimizerService, RouteRequest,
};
pub use travel_estimator_service::{TravelEstimatorService, TravelRequest};
