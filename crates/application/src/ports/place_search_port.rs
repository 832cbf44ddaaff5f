//! Point-of-interest search port

use std::fmt;

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Default number of results returned by a search
pub const DEFAULT_PLACE_LIMIT: u8 = 10;

/// Keyword search scoped to a city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSearchQuery {
    pub keywords: String,
    pub city: Option<String>,
    pub limit: u8,
}

impl PlaceSearchQuery {
    #[must_use]
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            city: None,
            limit: DEFAULT_PLACE_LIMIT,
        }
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit;
        self
    }
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl fmt::Display for PlaceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(address) = &self.address {
            write!(f, " ({address})")?;
        }
        if let Some(rating) = self.rating {
            write!(f, " ★{rating:.1}")?;
        }
        Ok(())
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlaceSearchPort: Send + Sync {
    async fn search_places(
        &self,
        query: &PlaceSearchQuery,
    ) -> Result<Vec<PlaceSummary>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PlaceSearchPort>();
    }

    #[test]
    fn display_includes_address_and_rating() {
        let place = PlaceSummary {
            name: "Big Wild Goose Pagoda".to_string(),
            address: Some("Yanta District".to_string()),
            coordinate: None,
            rating: Some(4.8),
        };
        assert_eq!(place.to_string(), "Big Wild Goose Pagoda (Yanta District) ★4.8");
    }

    #[test]
    fn display_name_only() {
        let place = PlaceSummary {
            name: "Bell Tower".to_string(),
            address: None,
            coordinate: None,
            rating: None,
        };
        assert_eq!(place.to_string(), "Bell Tower");
    }

    #[test]
    fn query_defaults() {
        let query = PlaceSearchQuery::new("hotpot").with_city("西安");
        assert_eq!(query.limit, DEFAULT_PLACE_LIMIT);
        assert_eq!(query.city.as_deref(), Some("西安"));
    }
}
