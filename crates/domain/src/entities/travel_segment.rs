//! Point-to-point travel estimate

use serde::{Deserialize, Serialize};

use crate::value_objects::TravelMode;

/// Travel estimate between two named places for one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelSegment {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
    pub distance_meters: u64,
    pub duration_seconds: u64,

    /// Fare or toll in the provider's currency (CNY); `None` if not reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monetary_cost: Option<f64>,

    /// Roads or transit lines used, in order
    #[serde(default)]
    pub route_description: String,
}

impl TravelSegment {
    /// Duration rounded to whole minutes (at least one for non-zero trips)
    #[must_use]
    pub const fn duration_minutes(&self) -> u64 {
        if self.duration_seconds == 0 {
            0
        } else {
            self.duration_seconds.div_ceil(60)
        }
    }

    /// Distance in kilometers
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters as f64 / 1000.0
    }
}
