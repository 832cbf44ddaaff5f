//! Geocode cache
//!
//! Read-through cache in front of the geocoder. Keys are normalised place
//! names, values are coordinates. Bounded by entry count, no expiry:
//! places do not move. Only successful lookups are stored.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use domain::Coordinate;
use moka::future::Cache;
use tracing::{debug, instrument};

/// Entry bound used when none is configured
pub const DEFAULT_MAX_ENTRIES: u64 = 1024;

/// Normalise a place name into a cache key
///
/// Trims, lower-cases and collapses inner whitespace, so `" Bell  Tower"`
/// and `"bell tower"` share an entry.
#[must_use]
pub fn normalize_place_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeocodeCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// Bounded concurrent geocode cache
pub struct GeocodeCache {
    cache: Cache<String, Coordinate>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for GeocodeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for GeocodeCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl GeocodeCache {
    /// Create a cache holding at most `max_entries` places
    #[must_use]
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries.max(1)).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get(&self, name: &str) -> Option<Coordinate> {
        let found = self.cache.get(&normalize_place_key(name)).await;
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Geocode cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub async fn insert(&self, name: &str, coordinate: Coordinate) {
        self.cache.insert(normalize_place_key(name), coordinate).await;
    }

    /// Return the cached coordinate or run `resolve` and store its success
    ///
    /// Concurrent callers for the same key share one `resolve` call. Errors
    /// are returned to every waiter and nothing is stored.
    pub async fn get_or_try_insert_with<F, E>(&self, name: &str, resolve: F) -> Result<Coordinate, E>
    where
        F: Future<Output = Result<Coordinate, E>>,
        E: Clone + Send + Sync + 'static,
    {
        if let Some(hit) = self.get(name).await {
            return Ok(hit);
        }
        self.cache
            .try_get_with(normalize_place_key(name), resolve)
            .await
            .map_err(|e: Arc<E>| E::clone(&e))
    }

    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    pub async fn stats(&self) -> GeocodeCacheStats {
        self.cache.run_pending_tasks().await;
        GeocodeCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn keys_are_normalised() {
        assert_eq!(normalize_place_key("  Bell   Tower "), "bell tower");
        assert_eq!(normalize_place_key("大雁塔"), "大雁塔");
        assert_eq!(normalize_place_key("\tMuslim\nQuarter"), "muslim quarter");
    }

    #[tokio::test]
    async fn equivalent_names_share_an_entry() {
        let cache = GeocodeCache::new(16);
        cache.insert("Bell Tower", Coordinate::xian_bell_tower()).await;

        assert_eq!(
            cache.get("  bell   TOWER").await,
            Some(Coordinate::xian_bell_tower())
        );
        assert_eq!(cache.get("Drum Tower").await, None);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn read_through_stores_success_only() {
        let cache = GeocodeCache::new(16);
        let calls = AtomicUsize::new(0);

        let failed: Result<Coordinate, String> = cache
            .get_or_try_insert_with("Atlantis", async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("not found".to_string())
            })
            .await;
        assert!(failed.is_err());

        for _ in 0..3 {
            let found: Result<Coordinate, String> = cache
                .get_or_try_insert_with("Big Wild Goose Pagoda", async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Coordinate::big_wild_goose_pagoda())
                })
                .await;
            assert_eq!(found, Ok(Coordinate::big_wild_goose_pagoda()));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().await.entries, 1);
    }

    #[tokio::test]
    async fn capacity_is_bounded() {
        let cache = GeocodeCache::new(4);
        for i in 0..64 {
            cache
                .insert(&format!("place {i}"), Coordinate::xian_bell_tower())
                .await;
        }
        assert!(cache.stats().await.entries <= 4);
    }

    #[tokio::test]
    async fn invalidate_all_empties() {
        let cache = GeocodeCache::default();
        cache.insert("Bell Tower", Coordinate::xian_bell_tower()).await;
        cache.invalidate_all().await;
        assert_eq!(cache.get("Bell Tower").await, None);
    }
}
