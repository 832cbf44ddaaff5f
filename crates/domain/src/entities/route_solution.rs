//! Result of ordering a set of stops

use serde::{Deserialize, Serialize};

/// How a route order was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStrategy {
    /// Only one stop besides the depot; no search needed
    Trivial,
    /// Exhaustive dynamic programming, optimal for the given matrix
    Exact,
    /// Construction plus local search, not guaranteed optimal
    Heuristic,
}

/// A visiting order over matrix indices and its total cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSolution {
    /// Permutation of `0..n`, starting at the depot
    pub order: Vec<usize>,

    /// Sum of arc costs along `order` (plus the return arc for closed loops)
    pub total_cost: u64,

    /// Whether the route returns to the depot
    pub closed_loop: bool,

    pub strategy: SolveStrategy,

    /// The time budget ran out before the search finished
    #[serde(default)]
    pub budget_exhausted: bool,
}

impl RouteSolution {
    /// Number of stops including the depot
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Index of the starting point
    #[must_use]
    pub fn depot(&self) -> Option<usize> {
        self.order.first().copied()
    }

    /// Indices in visiting order, repeating the depot at the end of a closed loop
    #[must_use]
    pub fn visits(&self) -> Vec<usize> {
        let mut visits = self.order.clone();
        if self.closed_loop {
            if let Some(depot) = self.depot() {
                visits.push(depot);
            }
        }
        visits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(closed_loop: bool) -> RouteSolution {
        RouteSolution {
            order: vec![0, 2, 1],
            total_cost: 10,
            closed_loop,
            strategy: SolveStrategy::Exact,
            budget_exhausted: false,
        }
    }

    #[test]
    fn closed_loop_visits_return_to_depot() {
        assert_eq!(solution(true).visits(), vec![0, 2, 1, 0]);
    }

    #[test]
    fn open_path_visits_end_at_last_stop() {
        assert_eq!(solution(false).visits(), vec![0, 2, 1]);
    }

    #[test]
    fn depot_is_first_index() {
        assert_eq!(solution(false).depot(), Some(0));
        assert_eq!(solution(false).len(), 3);
    }
}
