//! Raw AMap payloads
//!
//! Every field is optional and decoded leniently: the provider sends `[]`
//! where a string is empty, numbers as strings, and whole objects as `[]`
//! when they have no content. Conversions into [`crate::models`] enforce
//! what each operation actually needs.

use domain::Coordinate;
use serde::{
    Deserialize, Deserializer,
    de::{DeserializeOwned, Error as _},
};
use serde_json::Value;

use crate::{
    error::AmapError,
    models::{DistanceResult, GeocodeMatch, Poi, RoutePlan},
};

const STATUS_OK: &str = "1";

/// Joins road and line names in descriptions
pub(crate) const DESCRIPTION_SEPARATOR: &str = " → ";

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, AmapError> {
    serde_json::from_str(body).map_err(|e| AmapError::ParseError(e.to_string()))
}

// --- Lenient field decoders ---

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?)
        .filter(|f| *f >= 0.0)
        .map(|f| f.round() as u64))
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(D::Error::custom),
        _ => Ok(Vec::new()),
    }
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}

fn parse_location(raw: Option<&str>) -> Option<Coordinate> {
    raw.and_then(|s| s.parse().ok())
}

// --- Envelope ---

/// `status`/`info`/`infocode` carried by every v3 response
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    info: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    infocode: Option<String>,
}

impl Envelope {
    pub(crate) fn check(&self) -> Result<(), AmapError> {
        if self.status.as_deref() == Some(STATUS_OK) {
            return Ok(());
        }
        Err(AmapError::from_infocode(
            self.infocode.as_deref().unwrap_or_default(),
            self.info.as_deref().unwrap_or("unknown error"),
        ))
    }
}

// --- Geocoding ---

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default, deserialize_with = "lenient_vec")]
    geocodes: Vec<RawGeocode>,
}

#[derive(Debug, Deserialize)]
struct RawGeocode {
    #[serde(default, deserialize_with = "lenient_string")]
    formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    level: Option<String>,
}

impl GeocodeResponse {
    /// First match with a usable location
    pub(crate) fn into_match(self, address: &str) -> Result<GeocodeMatch, AmapError> {
        self.envelope.check()?;
        self.geocodes
            .into_iter()
            .find_map(|raw| {
                let location = parse_location(raw.location.as_deref())?;
                Some(GeocodeMatch {
                    formatted_address: raw
                        .formatted_address
                        .unwrap_or_else(|| address.to_string()),
                    location,
                    level: raw.level,
                })
            })
            .ok_or_else(|| AmapError::NotFound(address.to_string()))
    }
}

// --- Distance ---

#[derive(Debug, Deserialize)]
pub(crate) struct DistanceResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default, deserialize_with = "lenient_vec")]
    results: Vec<RawDistance>,
}

#[derive(Debug, Deserialize)]
struct RawDistance {
    #[serde(default, deserialize_with = "lenient_u64")]
    origin_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    distance: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    info: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    code: Option<String>,
}

impl DistanceResponse {
    /// Results ordered by origin position
    ///
    /// `origin_id` is one-based on the wire. A result without a distance is
    /// an error, never a zero.
    pub(crate) fn into_results(self, origin_count: usize) -> Result<Vec<DistanceResult>, AmapError> {
        self.envelope.check()?;

        let mut results = Vec::with_capacity(self.results.len());
        for raw in self.results {
            let origin_index = raw
                .origin_id
                .and_then(|id| usize::try_from(id).ok())
                .filter(|id| (1..=origin_count).contains(id))
                .map(|id| id - 1)
                .ok_or_else(|| {
                    AmapError::ParseError(format!(
                        "distance result has invalid origin_id {:?}",
                        raw.origin_id
                    ))
                })?;

            if raw.code.as_deref().is_some_and(|code| code != "0") {
                return Err(AmapError::NoRoute(raw.info.unwrap_or_else(|| {
                    format!("no route from origin {}", origin_index + 1)
                })));
            }

            let (Some(distance_meters), Some(duration_seconds)) = (raw.distance, raw.duration)
            else {
                return Err(AmapError::ParseError(format!(
                    "distance result for origin {} is incomplete",
                    origin_index + 1
                )));
            };

            results.push(DistanceResult {
                origin_index,
                distance_meters,
                duration_seconds,
            });
        }

        results.sort_by_key(|r| r.origin_index);
        if results
            .windows(2)
            .any(|pair| pair[0].origin_index == pair[1].origin_index)
        {
            return Err(AmapError::ParseError(
                "distance response repeats an origin".to_string(),
            ));
        }
        Ok(results)
    }
}

// --- Driving / walking / bicycling ---

#[derive(Debug, Deserialize)]
pub(crate) struct RouteResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default, deserialize_with = "lenient_object")]
    route: Option<RawRoute>,
}

/// v4 envelope used by the bicycling endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct BicyclingResponse {
    #[serde(default, deserialize_with = "lenient_u64")]
    errcode: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    errmsg: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    data: Option<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default, deserialize_with = "lenient_vec")]
    paths: Vec<RawPath>,
}

#[derive(Debug, Deserialize)]
struct RawPath {
    #[serde(default, deserialize_with = "lenient_u64")]
    distance: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    tolls: Option<f64>,
    #[serde(default, deserialize_with = "lenient_vec")]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default, deserialize_with = "lenient_string")]
    road: Option<String>,
}

/// Whether a path's tolls count as trip cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathCost {
    Tolls,
    Free,
}

impl RouteResponse {
    pub(crate) fn into_plan(self, cost: PathCost) -> Result<RoutePlan, AmapError> {
        self.envelope.check()?;
        first_path_plan(self.route, cost)
    }
}

impl BicyclingResponse {
    pub(crate) fn into_plan(self) -> Result<RoutePlan, AmapError> {
        match self.errcode {
            Some(0) | None => first_path_plan(self.data, PathCost::Free),
            Some(code) => Err(AmapError::from_infocode(
                &code.to_string(),
                self.errmsg.as_deref().unwrap_or("unknown error"),
            )),
        }
    }
}

fn first_path_plan(route: Option<RawRoute>, cost: PathCost) -> Result<RoutePlan, AmapError> {
    let path = route
        .and_then(|r| r.paths.into_iter().next())
        .ok_or_else(|| AmapError::NoRoute("provider returned no paths".to_string()))?;

    let (Some(distance_meters), Some(duration_seconds)) = (path.distance, path.duration) else {
        return Err(AmapError::ParseError(
            "route path is missing distance or duration".to_string(),
        ));
    };

    Ok(RoutePlan {
        distance_meters,
        duration_seconds,
        cost_yuan: Some(match cost {
            PathCost::Tolls => path.tolls.unwrap_or(0.0),
            PathCost::Free => 0.0,
        }),
        description: distinct_roads(&path.steps),
    })
}

/// Road names in first-seen order, unnamed steps skipped
fn distinct_roads(steps: &[RawStep]) -> String {
    let mut roads: Vec<&str> = Vec::new();
    for road in steps.iter().filter_map(|s| s.road.as_deref()) {
        if !roads.contains(&road) {
            roads.push(road);
        }
    }
    roads.join(DESCRIPTION_SEPARATOR)
}

// --- Transit ---

#[derive(Debug, Deserialize)]
pub(crate) struct TransitResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default, deserialize_with = "lenient_object")]
    route: Option<RawTransitRoute>,
}

#[derive(Debug, Deserialize)]
struct RawTransitRoute {
    #[serde(default, deserialize_with = "lenient_u64")]
    distance: Option<u64>,
    #[serde(default, deserialize_with = "lenient_vec")]
    transits: Vec<RawTransit>,
}

#[derive(Debug, Deserialize)]
struct RawTransit {
    #[serde(default, deserialize_with = "lenient_f64")]
    cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    distance: Option<u64>,
    #[serde(default, deserialize_with = "lenient_vec")]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    #[serde(default, deserialize_with = "lenient_object")]
    bus: Option<RawBus>,
    #[serde(default, deserialize_with = "lenient_object")]
    railway: Option<RawNamed>,
}

#[derive(Debug, Deserialize)]
struct RawBus {
    #[serde(default, deserialize_with = "lenient_vec")]
    buslines: Vec<RawNamed>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
}

impl RawSegment {
    /// Line ridden in this segment; the first busline is the chosen one
    fn line_name(self) -> Option<String> {
        self.bus
            .and_then(|bus| bus.buslines.into_iter().next())
            .and_then(|line| line.name)
            .or_else(|| self.railway.and_then(|rail| rail.name))
    }
}

impl TransitResponse {
    pub(crate) fn into_plan(self) -> Result<RoutePlan, AmapError> {
        self.envelope.check()?;
        let route = self
            .route
            .ok_or_else(|| AmapError::NoRoute("provider returned no route".to_string()))?;
        let route_distance = route.distance;
        let transit = route
            .transits
            .into_iter()
            .next()
            .ok_or_else(|| AmapError::NoRoute("no transit plan available".to_string()))?;

        let distance_meters = transit.distance.or(route_distance).ok_or_else(|| {
            AmapError::ParseError("transit plan is missing distance".to_string())
        })?;
        let duration_seconds = transit.duration.ok_or_else(|| {
            AmapError::ParseError("transit plan is missing duration".to_string())
        })?;

        let description = transit
            .segments
            .into_iter()
            .filter_map(RawSegment::line_name)
            .collect::<Vec<_>>()
            .join(DESCRIPTION_SEPARATOR);

        Ok(RoutePlan {
            distance_meters,
            duration_seconds,
            cost_yuan: transit.cost,
            description,
        })
    }
}

// --- Place search ---

#[derive(Debug, Deserialize)]
pub(crate) struct PlaceResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default, deserialize_with = "lenient_vec")]
    pois: Vec<RawPoi>,
}

#[derive(Debug, Deserialize)]
struct RawPoi {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    biz_ext: Option<RawBizExt>,
}

#[derive(Debug, Deserialize)]
struct RawBizExt {
    #[serde(default, deserialize_with = "lenient_f64")]
    rating: Option<f64>,
}

impl PlaceResponse {
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn into_pois(self, limit: usize) -> Result<Vec<Poi>, AmapError> {
        self.envelope.check()?;
        Ok(self
            .pois
            .into_iter()
            .filter_map(|raw| {
                Some(Poi {
                    name: raw.name?,
                    id: raw.id,
                    address: raw.address,
                    location: parse_location(raw.location.as_deref()),
                    rating: raw.biz_ext.and_then(|b| b.rating).map(|r| r as f32),
                })
            })
            .take(limit)
            .collect())
    }
}
