//! Whether a route returns to its start

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::DomainError;

/// Route shape requested by the caller
///
/// The two policies produce different optimal orders on the same matrix, so
/// callers choose explicitly. `OpenPath` ends at the last destination,
/// `ClosedLoop` adds the return leg to the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisitPolicy {
    /// Start at the origin and finish at the last destination
    #[default]
    OpenPath,
    /// Start and finish at the origin
    ClosedLoop,
}

impl VisitPolicy {
    #[must_use]
    pub const fn is_closed_loop(&self) -> bool {
        matches!(self, Self::ClosedLoop)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenPath => "open_path",
            Self::ClosedLoop => "closed_loop",
        }
    }
}

impl fmt::Display for VisitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "open_path" | "open" | "path" => Ok(Self::OpenPath),
            "closed_loop" | "closed" | "loop" | "round_trip" => Ok(Self::ClosedLoop),
            other => Err(DomainError::ValidationError(format!(
                "unknown visit policy '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_open_path() {
        assert_eq!(VisitPolicy::default(), VisitPolicy::OpenPath);
        assert!(!VisitPolicy::default().is_closed_loop());
    }

    #[test]
    fn parse_accepts_kebab_and_aliases() {
        assert_eq!("closed-loop".parse::<VisitPolicy>(), Ok(VisitPolicy::ClosedLoop));
        assert_eq!("round_trip".parse::<VisitPolicy>(), Ok(VisitPolicy::ClosedLoop));
        assert_eq!("open".parse::<VisitPolicy>(), Ok(VisitPolicy::OpenPath));
        assert!("zigzag".parse::<VisitPolicy>().is_err());
    }

    #[test]
    fn serde_is_snake_case() {
        let json = serde_json::to_string(&VisitPolicy::ClosedLoop).expect("serialize");
        assert_eq!(json, "\"closed_loop\"");
    }
}
