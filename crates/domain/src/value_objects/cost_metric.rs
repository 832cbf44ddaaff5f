//! Which measurement a route minimises

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

/// The cost a distance matrix carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CostMetric {
    /// Travel distance in meters
    #[default]
    Distance,
    /// Travel time in seconds
    Duration,
}

impl CostMetric {
    /// Unit suffix used when rendering a cost
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Distance => "meters",
            Self::Duration => "seconds",
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for CostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostMetric {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "distance" | "meters" => Ok(Self::Distance),
            "duration" | "time" | "seconds" => Ok(Self::Duration),
            other => Err(DomainError::ValidationError(format!(
                "unknown cost metric '{other}'"
            ))),
        }
    }
}
