//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod amap_adapter;
mod cached_geocoding_adapter;

pub use amap_adapter::AmapAdapter;
pub use cached_geocoding_adapter::CachedGeocodingAdapter;
