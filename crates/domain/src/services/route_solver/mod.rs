//! Route ordering over a distance matrix
//!
//! Finds a visiting order over every point of a [`DistanceMatrix`] that
//! starts at a depot and minimises the summed arc cost, either as an open
//! path or as a closed loop back to the depot.
//!
//! Small instances are solved exactly with Held–Karp dynamic programming.
//! Larger ones (and the fallback when the exact search runs out of time) use
//! nearest-neighbour construction followed by 2-opt and Or-opt local search.
//! Both respect a wall-clock budget and a caller-supplied interrupt, which
//! is polled between rounds so a cancelled caller gets [`SolverError::Cancelled`]
//! instead of a partial order.

mod held_karp;
mod local_search;

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::{
    entities::{DistanceMatrix, RouteSolution, SolveStrategy, UNREACHABLE},
    value_objects::VisitPolicy,
};

/// Largest instance (depot included) solved by exact search by default
pub const DEFAULT_EXACT_NODE_LIMIT: usize = 13;

/// Hard cap on the exact search size; the DP table grows as `2^n * n`
pub const MAX_EXACT_NODE_LIMIT: usize = 16;

/// Default wall-clock budget for one optimization
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(2);

/// Reasons the solver cannot produce an order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("At least 2 points are required to plan a route, got {0}")]
    TooFewPoints(usize),

    #[error("Depot index {depot} is outside a matrix of size {size}")]
    InvalidDepot { depot: usize, size: usize },

    #[error("No route with a finite cost visits every point")]
    NoFinitePath,

    #[error("Route optimization was cancelled")]
    Cancelled,
}

impl SolverError {
    /// Whether the instance itself cannot be solved (as opposed to the caller
    /// giving up)
    #[must_use]
    pub const fn is_infeasible(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Tuning knobs for [`RouteSolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// Instances with at most this many points use exact search
    pub exact_node_limit: usize,
    /// Wall-clock budget shared by every phase
    pub time_budget: Duration,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            exact_node_limit: DEFAULT_EXACT_NODE_LIMIT,
            time_budget: DEFAULT_TIME_BUDGET,
        }
    }
}

impl SolverOptions {
    #[must_use]
    pub const fn with_exact_node_limit(mut self, limit: usize) -> Self {
        self.exact_node_limit = limit;
        self
    }

    #[must_use]
    pub const fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Options that never use exact search
    #[must_use]
    pub const fn heuristic_only() -> Self {
        Self {
            exact_node_limit: 0,
            time_budget: DEFAULT_TIME_BUDGET,
        }
    }

    const fn effective_exact_limit(&self) -> usize {
        if self.exact_node_limit > MAX_EXACT_NODE_LIMIT {
            MAX_EXACT_NODE_LIMIT
        } else {
            self.exact_node_limit
        }
    }
}

/// Wall-clock deadline plus the caller's interrupt flag
pub(crate) struct Budget<'a> {
    deadline: Option<Instant>,
    interrupt: &'a dyn Fn() -> bool,
}

impl<'a> Budget<'a> {
    fn new(time_budget: Duration, interrupt: &'a dyn Fn() -> bool) -> Self {
        Self {
            deadline: Instant::now().checked_add(time_budget),
            interrupt,
        }
    }

    /// `Ok(true)` once the deadline has passed
    ///
    /// # Errors
    ///
    /// Returns `SolverError::Cancelled` when the caller interrupted.
    pub(crate) fn exhausted(&self) -> Result<bool, SolverError> {
        if (self.interrupt)() {
            return Err(SolverError::Cancelled);
        }
        Ok(self.deadline.is_some_and(|deadline| Instant::now() >= deadline))
    }
}

/// Computes visiting orders
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSolver {
    options: SolverOptions,
}

impl RouteSolver {
    #[must_use]
    pub const fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Order every point of `matrix`, starting at `depot`
    ///
    /// # Errors
    ///
    /// Returns `SolverError` when fewer than two points are given, the depot
    /// is out of range, or no finite-cost order exists.
    pub fn optimize(
        &self,
        matrix: &DistanceMatrix,
        depot: usize,
        policy: VisitPolicy,
    ) -> Result<RouteSolution, SolverError> {
        self.optimize_with_interrupt(matrix, depot, policy, &|| false)
    }

    /// Like [`optimize`](Self::optimize), polling `interrupt` between rounds
    ///
    /// # Errors
    ///
    /// In addition to the errors of `optimize`, returns
    /// `SolverError::Cancelled` as soon as `interrupt` returns `true`.
    pub fn optimize_with_interrupt(
        &self,
        matrix: &DistanceMatrix,
        depot: usize,
        policy: VisitPolicy,
        interrupt: &dyn Fn() -> bool,
    ) -> Result<RouteSolution, SolverError> {
        let n = matrix.size();
        if n < 2 {
            return Err(SolverError::TooFewPoints(n));
        }
        if depot >= n {
            return Err(SolverError::InvalidDepot { depot, size: n });
        }

        let closed_loop = policy.is_closed_loop();
        let budget = Budget::new(self.options.time_budget, interrupt);
        budget.exhausted()?;

        if n == 2 {
            let order = vec![depot, 1 - depot];
            return finish(matrix, order, closed_loop, SolveStrategy::Exact, false);
        }

        // The heuristic result doubles as the fallback when exact search
        // cannot finish within the budget.
        let heuristic = local_search::solve(matrix, depot, closed_loop, &budget)?;

        if n <= self.options.effective_exact_limit() && !heuristic.budget_exhausted {
            if let Some(order) = held_karp::solve(matrix, depot, closed_loop, &budget)? {
                return finish(matrix, order, closed_loop, SolveStrategy::Exact, false);
            }
            return finish(
                matrix,
                heuristic.order,
                closed_loop,
                SolveStrategy::Heuristic,
                true,
            );
        }

        finish(
            matrix,
            heuristic.order,
            closed_loop,
            SolveStrategy::Heuristic,
            heuristic.budget_exhausted,
        )
    }
}

/// Solve with default options
///
/// # Errors
///
/// See [`RouteSolver::optimize`].
pub fn optimize(
    matrix: &DistanceMatrix,
    depot: usize,
    policy: VisitPolicy,
) -> Result<RouteSolution, SolverError> {
    RouteSolver::default().optimize(matrix, depot, policy)
}

fn finish(
    matrix: &DistanceMatrix,
    order: Vec<usize>,
    closed_loop: bool,
    strategy: SolveStrategy,
    budget_exhausted: bool,
) -> Result<RouteSolution, SolverError> {
    let total_cost = matrix.path_cost(&order, closed_loop);
    if total_cost == UNREACHABLE {
        return Err(SolverError::NoFinitePath);
    }
    Ok(RouteSolution {
        order,
        total_cost,
        closed_loop,
        strategy,
        budget_exhausted,
    })
}
