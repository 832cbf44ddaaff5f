//! Result formatting utilities
//!
//! Pure functions turning routing results into text for the calling agent,
//! plus the structured payloads sent alongside that text. Nothing here
//! decides whether a result is an error; it only renders what it is given.

use domain::{Coordinate, CostMetric, DroppedPlace, TravelSegment};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApplicationError,
    ports::PlaceSummary,
    services::route_optimizer_service::OptimizedRoute,
};

/// Separator between stops in a rendered route
pub const ROUTE_ARROW: &str = " -> ";

// ── Structured payloads ─────────────────────────────────────────

/// Machine-readable form of an optimized route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteToolOutput {
    /// Stop names in visiting order; closed loops repeat the origin
    pub order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_distance_meters: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_seconds: Option<u64>,
    pub closed_loop: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DroppedPlace>,
}

impl From<&OptimizedRoute> for RouteToolOutput {
    fn from(route: &OptimizedRoute) -> Self {
        let (distance, duration) = match route.metric {
            CostMetric::Distance => (Some(route.total_cost), None),
            CostMetric::Duration => (None, Some(route.total_cost)),
        };
        Self {
            order: route.visit_names(),
            total_distance_meters: distance,
            total_duration_seconds: duration,
            closed_loop: route.policy.is_closed_loop(),
            dropped: route.dropped.clone(),
        }
    }
}

/// Machine-readable form of a resolved coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateToolOutput {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Provider wire form `"lon,lat"`
    pub location: String,
}

impl CoordinateToolOutput {
    #[must_use]
    pub fn new(name: impl Into<String>, coordinate: &Coordinate) -> Self {
        Self {
            name: name.into(),
            longitude: coordinate.longitude(),
            latitude: coordinate.latitude(),
            location: coordinate.to_provider_string(),
        }
    }
}

// ── Text rendering ──────────────────────────────────────────────

/// Render an optimized route
#[must_use]
pub fn format_route(route: &OptimizedRoute) -> String {
    let mut lines = vec![format!(
        "Optimized Route: {}",
        route.visit_names().join(ROUTE_ARROW)
    )];

    lines.push(match route.metric {
        CostMetric::Distance => format!("Total Distance: {} meters", route.total_cost),
        CostMetric::Duration => format!(
            "Total Duration: {} seconds ({} min)",
            route.total_cost,
            route.total_cost.div_ceil(60)
        ),
    });

    if route.budget_exhausted {
        lines.push("Note: search stopped at the time limit; order may not be optimal".to_string());
    }

    for dropped in &route.dropped {
        lines.push(format!("Note: skipped '{}' ({})", dropped.name, dropped.reason));
    }

    lines.join("\n")
}

/// Render a point-to-point estimate
#[must_use]
pub fn format_segment(segment: &TravelSegment) -> String {
    let mut summary = format!(
        "{} → {} by {}: {} min, {:.1} km",
        segment.origin,
        segment.destination,
        segment.mode.label().to_lowercase(),
        segment.duration_minutes(),
        segment.distance_km()
    );

    if let Some(cost) = segment.monetary_cost {
        if cost > 0.0 {
            summary.push_str(&format!(", cost ¥{cost:.2}"));
        }
    }

    if segment.route_description.is_empty() {
        summary
    } else {
        format!("{summary}\nVia: {}", segment.route_description)
    }
}

/// Render a resolved coordinate
#[must_use]
pub fn format_coordinate(name: &str, coordinate: &Coordinate) -> String {
    format!("📍 {name}: {}", coordinate.to_provider_string())
}

/// Render a numbered list of search hits
#[must_use]
pub fn format_places(places: &[PlaceSummary]) -> String {
    if places.is_empty() {
        return "No places found".to_string();
    }
    places
        .iter()
        .enumerate()
        .map(|(i, place)| format!("{}. {place}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a failure with its machine-readable code
#[must_use]
pub fn format_failure(error: &ApplicationError) -> String {
    format!("Error [{}]: {error}", error.code())
}
