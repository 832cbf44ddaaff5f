//! Cache implementations
//!
//! - `GeocodeCache`: bounded in-memory name-to-coordinate cache (moka)

mod geocode_cache;

pub use geocode_cache::{DEFAULT_MAX_ENTRIES, GeocodeCache, GeocodeCacheStats, normalize_place_key};
