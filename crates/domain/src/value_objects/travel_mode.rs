//! Transport mode value object

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

/// How a traveller moves between two points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// Car
    #[default]
    Driving,
    /// On foot
    Walking,
    /// Public transport (bus, metro, rail)
    Transit,
    /// Bicycle
    Bicycling,
}

impl TravelMode {
    /// All modes in declaration order
    pub const ALL: [Self; 4] = [
        Self::Driving,
        Self::Walking,
        Self::Transit,
        Self::Bicycling,
    ];

    /// Stable lowercase identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Transit => "transit",
            Self::Bicycling => "bicycling",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Driving => "Driving",
            Self::Walking => "Walking",
            Self::Transit => "Public transit",
            Self::Bicycling => "Cycling",
        }
    }

    /// Transit routing is scoped to a city and needs one
    #[must_use]
    pub const fn requires_city(&self) -> bool {
        matches!(self, Self::Transit)
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" | "drive" | "car" => Ok(Self::Driving),
            "walking" | "walk" | "foot" => Ok(Self::Walking),
            "transit" | "public" | "bus" | "metro" => Ok(Self::Transit),
            "bicycling" | "cycling" | "bike" | "bicycle" => Ok(Self::Bicycling),
            other => Err(DomainError::UnknownTravelMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_driving() {
        assert_eq!(TravelMode::default(), TravelMode::Driving);
    }

    #[test]
    fn parses_canonical_names() {
        for mode in TravelMode::ALL {
            assert_eq!(mode.as_str().parse::<TravelMode>(), Ok(mode));
        }
    }

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("  Car ".parse::<TravelMode>(), Ok(TravelMode::Driving));
        assert_eq!("WALK".parse::<TravelMode>(), Ok(TravelMode::Walking));
        assert_eq!("bike".parse::<TravelMode>(), Ok(TravelMode::Bicycling));
        assert_eq!("metro".parse::<TravelMode>(), Ok(TravelMode::Transit));
    }

    #[test]
    fn rejects_unknown() {
        assert!(matches!(
            "hovercraft".parse::<TravelMode>(),
            Err(DomainError::UnknownTravelMode(_))
        ));
    }

    #[test]
    fn only_transit_requires_city() {
        assert!(TravelMode::Transit.requires_city());
        assert!(!TravelMode::Driving.requires_city());
        assert!(!TravelMode::Walking.requires_city());
        assert!(!TravelMode::Bicycling.requires_city());
    }

    #[test]
    fn serde_is_lowercase() {
        let json = serde_json::to_string(&TravelMode::Bicycling).expect("serialize");
        assert_eq!(json, "\"bicycling\"");
        let mode: TravelMode = serde_json::from_str("\"transit\"").expect("deserialize");
        assert_eq!(mode, TravelMode::Transit);
    }
}
