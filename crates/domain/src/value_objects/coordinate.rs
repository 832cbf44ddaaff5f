//! Geographic coordinate value object
//!
//! The mapping provider speaks longitude first, so the wire form is
//! `"lon,lat"` and coordinate lists are joined with `|`.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

/// Separator between coordinates in a provider list parameter
pub const COORDINATE_LIST_SEPARATOR: char = '|';

/// A WGS-84 style point with longitude and latitude in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if longitude is not in
    /// [-180, 180] or latitude is not in [-90, 90]
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, DomainError> {
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "{longitude},{latitude}"
            )));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Create a coordinate without validation (for trusted constants)
    #[must_use]
    pub const fn new_unchecked(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Provider wire form, `"lon,lat"` with six decimals
    #[must_use]
    pub fn to_provider_string(&self) -> String {
        format!("{:.6},{:.6}", self.longitude, self.latitude)
    }

    /// Join coordinates into a provider list parameter (`"lon,lat|lon,lat"`)
    #[must_use]
    pub fn join(coordinates: &[Self]) -> String {
        coordinates
            .iter()
            .map(Self::to_provider_string)
            .collect::<Vec<_>>()
            .join(&COORDINATE_LIST_SEPARATOR.to_string())
    }

    /// Great-circle distance to another coordinate in meters
    ///
    /// Uses the Haversine formula
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lon / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl FromStr for Coordinate {
    type Err = DomainError;

    /// Parse the provider wire form `"lon,lat"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = s
            .trim()
            .split_once(',')
            .ok_or_else(|| DomainError::InvalidCoordinate(s.to_string()))?;

        let longitude = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::InvalidCoordinate(s.to_string()))?;
        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::InvalidCoordinate(s.to_string()))?;

        Self::new(longitude, latitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_provider_string())
    }
}

/// Well-known points used as defaults and in tests
impl Coordinate {
    /// Xi'an Bell Tower
    #[must_use]
    pub const fn xian_bell_tower() -> Self {
        Self::new_unchecked(108.947_040, 34.259_430)
    }

    /// Big Wild Goose Pagoda, Xi'an
    #[must_use]
    pub const fn big_wild_goose_pagoda() -> Self {
        Self::new_unchecked(108.964_177, 34.218_490)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_coordinate() {
        let c = Coordinate::new(108.94, 34.26).expect("valid coordinate");
        assert!((c.longitude() - 108.94).abs() < f64::EPSILON);
        assert!((c.latitude() - 34.26).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_coordinates() {
        assert!(Coordinate::new(180.0, 90.0).is_ok());
        assert!(Coordinate::new(-180.0, -90.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(Coordinate::new(181.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 91.0).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn provider_string_is_longitude_first() {
        let c = Coordinate::new(108.947_04, 34.259_43).expect("valid");
        assert_eq!(c.to_provider_string(), "108.947040,34.259430");
    }

    #[test]
    fn parses_provider_string() {
        let c: Coordinate = "116.481028,39.989643".parse().expect("parse");
        assert!((c.longitude() - 116.481_028).abs() < 1e-9);
        assert!((c.latitude() - 39.989_643).abs() < 1e-9);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Coordinate>().is_err());
        assert!("116.48".parse::<Coordinate>().is_err());
        assert!("abc,def".parse::<Coordinate>().is_err());
        assert!("39.98,116.48".parse::<Coordinate>().is_err());
    }

    #[test]
    fn join_uses_pipe_separator() {
        let joined = Coordinate::join(&[
            Coordinate::new_unchecked(1.0, 2.0),
            Coordinate::new_unchecked(3.5, 4.25),
        ]);
        assert_eq!(joined, "1.000000,2.000000|3.500000,4.250000");
    }

    #[test]
    fn join_empty_is_empty() {
        assert_eq!(Coordinate::join(&[]), "");
    }

    #[test]
    fn distance_to_self_is_zero() {
        let c = Coordinate::xian_bell_tower();
        assert!(c.distance_meters(&c).abs() < 0.001);
    }

    #[test]
    fn distance_bell_tower_to_pagoda() {
        let d = Coordinate::xian_bell_tower().distance_meters(&Coordinate::big_wild_goose_pagoda());
        // Roughly 4.8 km as the crow flies
        assert!((d - 4_850.0).abs() < 300.0, "got {d}");
    }

    #[test]
    fn serialization_roundtrip() {
        let c = Coordinate::xian_bell_tower();
        let json = serde_json::to_string(&c).expect("serialize");
        assert!(json.contains("longitude"));
        let back: Coordinate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(c, back);
    }
}
