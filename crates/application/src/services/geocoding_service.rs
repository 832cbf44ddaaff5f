//! Geocoding service
//!
//! Resolves place names one at a time or as a batch. A batch fans out to the
//! geocoding port with bounded concurrency and waits for every lookup before
//! returning. Individual misses are recorded as dropped places; only
//! credential/configuration failures and cancellation abort the batch.

use std::sync::Arc;

use domain::{Coordinate, DroppedPlace, Place};
use futures::{StreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::{error::ApplicationError, ports::GeocodingPort};

/// Default number of in-flight provider requests per batch
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Outcome of resolving a batch of names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPlaces {
    /// Places with coordinates, in input order
    pub resolved: Vec<Place>,
    /// Names that could not be resolved, in input order
    pub dropped: Vec<DroppedPlace>,
}

impl ResolvedPlaces {
    /// Whether `name` made it into the resolved list
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resolved.iter().any(|p| p.name == name)
    }
}

/// Resolves names to coordinates through a [`GeocodingPort`]
#[derive(Clone)]
pub struct GeocodingService {
    port: Arc<dyn GeocodingPort>,
    max_concurrency: usize,
}

impl std::fmt::Debug for GeocodingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingService")
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl GeocodingService {
    #[must_use]
    pub fn new(port: Arc<dyn GeocodingPort>) -> Self {
        Self {
            port,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Limit the number of concurrent lookups (at least one)
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Resolve a single name
    ///
    /// Blank names are rejected without calling the provider.
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> Result<Coordinate, ApplicationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApplicationError::LocationNotFound(
                "empty place name".to_string(),
            ));
        }
        self.port.geocode(name).await
    }

    /// Resolve every name, dropping the ones that fail
    ///
    /// Input order is preserved in both output lists.
    #[instrument(skip(self, names, cancel), fields(count = names.len()))]
    pub async fn resolve_all(
        &self,
        names: &[String],
        cancel: &CancellationToken,
    ) -> Result<ResolvedPlaces, ApplicationError> {
        let lookups = stream::iter(names.iter().cloned())
            .map(|name| async move {
                let result = self.resolve(&name).await;
                (name, result)
            })
            .buffered(self.max_concurrency)
            .collect::<Vec<_>>();

        let results = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ApplicationError::Cancelled),
            results = lookups => results,
        };

        let mut outcome = ResolvedPlaces::default();
        for (name, result) in results {
            match result {
                Ok(coordinate) => {
                    debug!(%name, %coordinate, "Resolved place");
                    outcome.resolved.push(Place::resolved(name, coordinate));
                },
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(%name, error = %e, "Dropping unresolvable place");
                    outcome
                        .dropped
                        .push(DroppedPlace::new(name, drop_reason(&e)));
                },
            }
        }
        Ok(outcome)
    }
}

/// Short human-readable reason for a dropped place
fn drop_reason(error: &ApplicationError) -> String {
    match error {
        ApplicationError::LocationNotFound(_) => "location not found".to_string(),
        ApplicationError::Timeout(_) => "geocoding timed out".to_string(),
        ApplicationError::ProviderUnavailable(_) => "geocoding service unavailable".to_string(),
        other => other.to_string(),
    }
}
