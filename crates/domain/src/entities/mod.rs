//! Domain entities - Objects owned by a single routing request

mod distance_matrix;
mod place;
mod route_solution;
mod travel_segment;

pub use distance_matrix::{DistanceMatrix, MatrixBuilder, UNREACHABLE};
pub use place::{DroppedPlace, Place};
pub use route_solution::{RouteSolution, SolveStrategy};
pub use travel_segment::TravelSegment;
