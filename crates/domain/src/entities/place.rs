//! Named place entity

use serde::{Deserialize, Serialize};

use crate::value_objects::Coordinate;

/// A user-supplied place name and, once resolved, its coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Free-text name as given by the caller
    pub name: String,

    /// Coordinate resolved by the geocoder, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
}

impl Place {
    /// A place whose coordinate is not yet known
    #[must_use]
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinate: None,
        }
    }

    /// A place with a known coordinate
    #[must_use]
    pub fn resolved(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate: Some(coordinate),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.coordinate.is_some()
    }
}

/// A place that was left out of a route, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedPlace {
    pub name: String,
    pub reason: String,
}

impl DroppedPlace {
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
