//! Route optimization pipeline
//!
//! geocode every stop → build the distance matrix → solve the visiting order.
//!
//! Destinations that cannot be geocoded are dropped and reported; the
//! request only fails when fewer than two locations (origin included)
//! remain. With a single remaining destination the order is trivial and the
//! solver is skipped. Solving runs on the blocking pool and observes the
//! request's cancellation token.

use domain::{
    Coordinate, CostMetric, DistanceMatrix, DroppedPlace, Place, RouteSolution, RouteSolver,
    SolveStrategy, SolverOptions, TravelMode, VisitPolicy,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    services::{
        distance_matrix_service::{DistanceMatrixService, MATRIX_MODES},
        geocoding_service::GeocodingService,
    },
};

/// Defaults applied to requests that do not override them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteOptimizerConfig {
    pub mode: TravelMode,
    pub metric: CostMetric,
    pub policy: VisitPolicy,
    pub solver: SolverOptions,
}

/// A request to order a set of destinations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destinations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TravelMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<CostMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<VisitPolicy>,
}

impl RouteRequest {
    #[must_use]
    pub fn new(origin: impl Into<String>, destinations: Vec<String>) -> Self {
        Self {
            origin: origin.into(),
            destinations,
            mode: None,
            metric: None,
            policy: None,
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub const fn with_metric(mut self, metric: CostMetric) -> Self {
        self.metric = Some(metric);
        self
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: VisitPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// The ordered stops of an optimized route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    /// Stops in visiting order, origin first
    pub stops: Vec<Place>,
    pub total_cost: u64,
    pub metric: CostMetric,
    pub mode: TravelMode,
    pub policy: VisitPolicy,
    pub strategy: SolveStrategy,
    #[serde(default)]
    pub budget_exhausted: bool,
    /// Destinations left out, with reasons
    #[serde(default)]
    pub dropped: Vec<DroppedPlace>,
}

impl OptimizedRoute {
    /// Stop names in visiting order, repeating the origin for closed loops
    #[must_use]
    pub fn visit_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stops.iter().map(|p| p.name.clone()).collect();
        if self.policy.is_closed_loop() {
            if let Some(origin) = self.stops.first() {
                names.push(origin.name.clone());
            }
        }
        names
    }
}

/// Orders destinations by travel cost
#[derive(Debug, Clone)]
pub struct RouteOptimizerService {
    geocoding: GeocodingService,
    matrix: DistanceMatrixService,
    config: RouteOptimizerConfig,
}

impl RouteOptimizerService {
    #[must_use]
    pub const fn new(
        geocoding: GeocodingService,
        matrix: DistanceMatrixService,
        config: RouteOptimizerConfig,
    ) -> Self {
        Self {
            geocoding,
            matrix,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &RouteOptimizerConfig {
        &self.config
    }

    /// Optimize the visiting order for `request`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when no destination names are given
    /// - `LocationNotFound` when the origin itself cannot be geocoded
    /// - `Infeasible` when fewer than two locations resolve or the solver finds no finite order
    /// - `MatrixBuild`, credential errors and `Cancelled` from the stages below
    #[instrument(skip(self, request, cancel), fields(origin = %request.origin, destinations = request.destinations.len()))]
    pub async fn optimize(
        &self,
        request: &RouteRequest,
        cancel: &CancellationToken,
    ) -> Result<OptimizedRoute, ApplicationError> {
        let mode = request.mode.unwrap_or(self.config.mode);
        let metric = request.metric.unwrap_or(self.config.metric);
        let policy = request.policy.unwrap_or(self.config.policy);
        if !MATRIX_MODES.contains(&mode) {
            return Err(ApplicationError::InvalidInput(format!(
                "routes can only be optimized for driving or walking, not {mode}"
            )));
        }

        let origin = request.origin.trim().to_string();
        if origin.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "origin must not be empty".to_string(),
            ));
        }
        let destinations: Vec<String> = request
            .destinations
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        if destinations.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "at least one destination is required".to_string(),
            ));
        }

        let mut names = Vec::with_capacity(destinations.len() + 1);
        names.push(origin.clone());
        names.extend(destinations);

        let places = self.geocoding.resolve_all(&names, cancel).await?;
        if !places.contains(&origin) {
            return Err(ApplicationError::LocationNotFound(origin));
        }
        if places.resolved.len() < 2 {
            return Err(ApplicationError::Infeasible(format!(
                "fewer than 2 locations could be resolved ({} of {})",
                places.resolved.len(),
                names.len()
            )));
        }

        let stops = places.resolved;
        let coordinates: Vec<_> = stops.iter().filter_map(|p| p.coordinate).collect();

        let solution = if coordinates.len() == 2 {
            self.trivial_solution(&coordinates, mode, metric, policy, cancel)
                .await?
        } else {
            let matrix = self.matrix.build(&coordinates, mode, metric, cancel).await?;
            self.solve(matrix, policy, cancel).await?
        };

        info!(
            stops = solution.order.len(),
            total_cost = solution.total_cost,
            strategy = ?solution.strategy,
            dropped = places.dropped.len(),
            "Route optimized"
        );

        let ordered = solution
            .order
            .iter()
            .filter_map(|&i| stops.get(i).cloned())
            .collect();

        Ok(OptimizedRoute {
            stops: ordered,
            total_cost: solution.total_cost,
            metric,
            mode,
            policy,
            strategy: solution.strategy,
            budget_exhausted: solution.budget_exhausted,
            dropped: places.dropped,
        })
    }

    /// Origin plus one destination: measure the leg(s) directly
    async fn trivial_solution(
        &self,
        coordinates: &[Coordinate],
        mode: TravelMode,
        metric: CostMetric,
        policy: VisitPolicy,
        cancel: &CancellationToken,
    ) -> Result<RouteSolution, ApplicationError> {
        debug!("Single destination, skipping solver");
        let (origin, destination) = (coordinates[0], coordinates[1]);

        let legs = async {
            let outbound = self.matrix.measure(origin, destination, mode).await?;
            let mut total = outbound.cost(metric);
            if policy.is_closed_loop() {
                let inbound = self.matrix.measure(destination, origin, mode).await?;
                total = total.saturating_add(inbound.cost(metric));
            }
            Ok::<_, ApplicationError>(total)
        };

        let total_cost = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ApplicationError::Cancelled),
            total = legs => total?,
        };

        Ok(RouteSolution {
            order: vec![0, 1],
            total_cost,
            closed_loop: policy.is_closed_loop(),
            strategy: SolveStrategy::Trivial,
            budget_exhausted: false,
        })
    }

    async fn solve(
        &self,
        matrix: DistanceMatrix,
        policy: VisitPolicy,
        cancel: &CancellationToken,
    ) -> Result<RouteSolution, ApplicationError> {
        let solver = RouteSolver::new(self.config.solver);
        let token = cancel.clone();
        let handle = tokio::task::spawn_blocking(move || {
            solver.optimize_with_interrupt(&matrix, 0, policy, &|| token.is_cancelled())
        });
        let solution = handle
            .await
            .map_err(|e| ApplicationError::Internal(format!("solver task failed: {e}")))??;
        Ok(solution)
    }
}
