//! Route optimization settings

use std::time::Duration;

use application::{RouteOptimizerConfig, services::MATRIX_MODES};
use domain::{CostMetric, SolverOptions, TravelMode, VisitPolicy};
use serde::{Deserialize, Serialize};

/// How routes are measured and solved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Concurrent provider calls per fan-out (default: 4)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Mode used for distance matrices (default: driving)
    #[serde(default)]
    pub matrix_mode: TravelMode,

    /// Quantity the solver minimizes (default: distance)
    #[serde(default)]
    pub metric: CostMetric,

    /// Open path or closed loop (default: open path)
    #[serde(default)]
    pub visit_policy: VisitPolicy,

    /// Instances up to this many points are solved exactly (default: 13)
    #[serde(default = "default_exact_node_limit")]
    pub exact_node_limit: usize,

    /// Wall-clock budget for one solve in milliseconds (default: 2000)
    #[serde(default = "default_solver_time_budget_ms")]
    pub solver_time_budget_ms: u64,
}

const fn default_max_concurrency() -> usize {
    application::DEFAULT_MAX_CONCURRENCY
}

const fn default_exact_node_limit() -> usize {
    13
}

const fn default_solver_time_budget_ms() -> u64 {
    2_000
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            matrix_mode: TravelMode::default(),
            metric: CostMetric::default(),
            visit_policy: VisitPolicy::default(),
            exact_node_limit: default_exact_node_limit(),
            solver_time_budget_ms: default_solver_time_budget_ms(),
        }
    }
}

impl RoutingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("routing.max_concurrency must be at least 1".to_string());
        }
        if !MATRIX_MODES.contains(&self.matrix_mode) {
            return Err(format!(
                "routing.matrix_mode must be driving or walking, got {}",
                self.matrix_mode
            ));
        }
        if self.solver_time_budget_ms == 0 {
            return Err("routing.solver_time_budget_ms must be greater than 0".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub const fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            exact_node_limit: self.exact_node_limit,
            time_budget: Duration::from_millis(self.solver_time_budget_ms),
        }
    }

    #[must_use]
    pub const fn optimizer_config(&self) -> RouteOptimizerConfig {
        RouteOptimizerConfig {
            mode: self.matrix_mode,
            metric: self.metric,
            policy: self.visit_policy,
            solver: self.solver_options(),
        }
    }
}
