//! Distance measurement port
//!
//! One call measures travel from many origins to a single destination, which
//! is exactly one column of a distance matrix.

use async_trait::async_trait;
use domain::{Coordinate, CostMetric, TravelMode};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Travel distance and time for one origin-destination pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegMeasure {
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

impl LegMeasure {
    #[must_use]
    pub const fn new(distance_meters: u64, duration_seconds: u64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }

    /// The value of the requested metric
    #[must_use]
    pub const fn cost(&self, metric: CostMetric) -> u64 {
        match metric {
            CostMetric::Distance => self.distance_meters,
            CostMetric::Duration => self.duration_seconds,
        }
    }
}

/// Many-to-one distance lookup
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DistancePort: Send + Sync {
    /// Measure travel from every origin to `destination`
    ///
    /// The result holds exactly one entry per origin, in origin order.
    async fn distances_to(
        &self,
        origins: &[Coordinate],
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Vec<LegMeasure>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn DistancePort>();
    }

    #[test]
    fn cost_selects_metric() {
        let leg = LegMeasure::new(1_200, 300);
        assert_eq!(leg.cost(CostMetric::Distance), 1_200);
        assert_eq!(leg.cost(CostMetric::Duration), 300);
    }
}
