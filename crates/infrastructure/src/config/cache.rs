//! Geocode cache settings

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_MAX_ENTRIES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeCacheConfig {
    /// Whether geocode results are cached (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum cached places (default: 1024)
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

const fn default_true() -> bool {
    true
}

const fn default_max_entries() -> u64 {
    DEFAULT_MAX_ENTRIES
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
        }
    }
}

impl GeocodeCacheConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.max_entries == 0 {
            return Err("geocode_cache.max_entries must be greater than 0".to_string());
        }
        Ok(())
    }
}
