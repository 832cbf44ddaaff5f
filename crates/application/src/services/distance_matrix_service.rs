//! Distance matrix builder
//!
//! Issues one many-to-one query per destination column with all points as
//! origins, so an `n`-point matrix costs `n` provider calls. Columns are
//! fetched with bounded concurrency; the first failed column aborts the
//! whole build and no cell is ever guessed.

use std::sync::Arc;

use domain::{Coordinate, CostMetric, DistanceMatrix, MatrixBuilder, TravelMode};
use futures::{StreamExt, TryStreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{DistancePort, LegMeasure},
    services::geocoding_service::DEFAULT_MAX_CONCURRENCY,
};

/// Modes the provider can measure in bulk
pub const MATRIX_MODES: [TravelMode; 2] = [TravelMode::Driving, TravelMode::Walking];

/// Builds [`DistanceMatrix`] values through a [`DistancePort`]
#[derive(Clone)]
pub struct DistanceMatrixService {
    port: Arc<dyn DistancePort>,
    max_concurrency: usize,
}

impl std::fmt::Debug for DistanceMatrixService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceMatrixService")
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl DistanceMatrixService {
    #[must_use]
    pub fn new(port: Arc<dyn DistancePort>) -> Self {
        Self {
            port,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Measure a single leg
    pub async fn measure(
        &self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> Result<LegMeasure, ApplicationError> {
        let legs = self.port.distances_to(&[from], to, mode).await?;
        match legs.as_slice() {
            [leg] => Ok(*leg),
            other => Err(ApplicationError::ProviderRejected(format!(
                "expected 1 distance result, got {}",
                other.len()
            ))),
        }
    }

    /// Build the full matrix over `points`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for fewer than two points or a mode without bulk support
    /// - `MatrixBuild` naming the first column that failed or came back malformed
    /// - credential, configuration and cancellation errors unchanged
    #[instrument(skip(self, points, cancel), fields(n = points.len(), %mode, %metric))]
    pub async fn build(
        &self,
        points: &[Coordinate],
        mode: TravelMode,
        metric: CostMetric,
        cancel: &CancellationToken,
    ) -> Result<DistanceMatrix, ApplicationError> {
        let n = points.len();
        if n < 2 {
            return Err(ApplicationError::InvalidInput(format!(
                "a distance matrix needs at least 2 points, got {n}"
            )));
        }
        if !MATRIX_MODES.contains(&mode) {
            return Err(ApplicationError::InvalidInput(format!(
                "{mode} distances cannot be measured in bulk"
            )));
        }

        let columns = stream::iter(0..n)
            .map(|column| async move {
                let legs = self
                    .port
                    .distances_to(points, points[column], mode)
                    .await
                    .map_err(|e| column_error(column, e))?;
                if legs.len() != n {
                    return Err(ApplicationError::MatrixBuild {
                        column,
                        reason: format!("expected {n} results, got {}", legs.len()),
                    });
                }
                debug!(column, "Fetched matrix column");
                Ok::<_, ApplicationError>((column, legs))
            })
            .buffer_unordered(self.max_concurrency)
            .try_collect::<Vec<_>>();

        let columns = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ApplicationError::Cancelled),
            columns = columns => columns.inspect_err(|e| warn!(error = %e, "Matrix build failed"))?,
        };

        let mut builder = MatrixBuilder::new(n);
        for (column, legs) in columns {
            let costs: Vec<u64> = legs.iter().map(|leg| leg.cost(metric)).collect();
            builder.set_column(column, &costs)?;
        }
        Ok(builder.build()?)
    }
}

fn column_error(column: usize, error: ApplicationError) -> ApplicationError {
    if error.is_fatal() {
        error
    } else {
        ApplicationError::MatrixBuild {
            column,
            reason: error.to_string(),
        }
    }
}
