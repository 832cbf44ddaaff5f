//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod cost_metric;
mod travel_mode;
mod visit_policy;

pub use coordinate::{COORDINATE_LIST_SEPARATOR, Coordinate};
pub use cost_metric::CostMetric;
pub use travel_mode::TravelMode;
pub use visit_policy::VisitPolicy;
