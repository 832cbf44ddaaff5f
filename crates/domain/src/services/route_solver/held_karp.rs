//! Exact search by dynamic programming over subsets (Held–Karp)
//!
//! `best[mask][last]` is the cheapest path that leaves the depot, visits
//! exactly the non-depot points in `mask` and ends at `last`. The table has
//! `2^m * m` entries for `m = n - 1`, which is why the caller caps `n`.

use super::{Budget, SolverError};
use crate::entities::{DistanceMatrix, UNREACHABLE};

const NO_PARENT: usize = usize::MAX;

/// How many subsets are expanded between budget checks
const CHECK_INTERVAL: usize = 64;

/// Optimal order starting at `depot`, or `None` if the budget ran out
///
/// When no finite order exists the identity order is returned and the
/// caller's cost check reports the infeasibility.
pub(super) fn solve(
    matrix: &DistanceMatrix,
    depot: usize,
    closed_loop: bool,
    budget: &Budget<'_>,
) -> Result<Option<Vec<usize>>, SolverError> {
    let others: Vec<usize> = (0..matrix.size()).filter(|&i| i != depot).collect();
    let m = others.len();
    let full: usize = (1 << m) - 1;

    let mut best = vec![UNREACHABLE; (full + 1) * m];
    let mut parent = vec![NO_PARENT; (full + 1) * m];

    for (k, &node) in others.iter().enumerate() {
        best[(1 << k) * m + k] = matrix.cost(depot, node);
    }

    for mask in 1..=full {
        if mask % CHECK_INTERVAL == 0 && budget.exhausted()? {
            return Ok(None);
        }
        for last in 0..m {
            if mask & (1 << last) == 0 {
                continue;
            }
            let current = best[mask * m + last];
            if current == UNREACHABLE {
                continue;
            }
            for next in 0..m {
                if mask & (1 << next) != 0 {
                    continue;
                }
                let slot = (mask | (1 << next)) * m + next;
                let candidate = current.saturating_add(matrix.cost(others[last], others[next]));
                if candidate < best[slot] {
                    best[slot] = candidate;
                    parent[slot] = last;
                }
            }
        }
    }

    let mut best_last = None;
    let mut best_total = UNREACHABLE;
    for last in 0..m {
        let closing = if closed_loop {
            matrix.cost(others[last], depot)
        } else {
            0
        };
        let total = best[full * m + last].saturating_add(closing);
        if total < best_total {
            best_total = total;
            best_last = Some(last);
        }
    }

    let Some(mut last) = best_last else {
        let mut identity = Vec::with_capacity(m + 1);
        identity.push(depot);
        identity.extend(others);
        return Ok(Some(identity));
    };

    let mut reversed = Vec::with_capacity(m);
    let mut mask = full;
    loop {
        reversed.push(others[last]);
        let previous = parent[mask * m + last];
        mask &= !(1 << last);
        if previous == NO_PARENT {
            break;
        }
        last = previous;
    }

    let mut order = Vec::with_capacity(m + 1);
    order.push(depot);
    order.extend(reversed.into_iter().rev());
    Ok(Some(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn run(matrix: &DistanceMatrix, depot: usize, closed_loop: bool) -> Vec<usize> {
        let never = || false;
        let budget = Budget::new(Duration::from_secs(60), &never);
        solve(matrix, depot, closed_loop, &budget)
            .expect("not cancelled")
            .expect("within budget")
    }

    #[test]
    fn reconstructs_full_permutation() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0, 1, 50, 50, 50],
            vec![50, 0, 1, 50, 50],
            vec![50, 50, 0, 1, 50],
            vec![50, 50, 50, 0, 1],
            vec![1, 50, 50, 50, 0],
        ])
        .expect("square");
        assert_eq!(run(&matrix, 0, true), vec![0, 1, 2, 3, 4]);
        assert_eq!(run(&matrix, 2, true), vec![2, 3, 4, 0, 1]);
    }

    #[test]
    fn infeasible_instance_returns_identity() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0, UNREACHABLE, UNREACHABLE],
            vec![1, 0, 1],
            vec![1, 1, 0],
        ])
        .expect("square");
        assert_eq!(run(&matrix, 0, false), vec![0, 1, 2]);
    }

    #[test]
    fn expired_budget_gives_up() {
        let never = || false;
        let budget = Budget::new(Duration::ZERO, &never);
        let rows = (0..10)
            .map(|i: u64| (0..10).map(|j: u64| i.abs_diff(j)).collect())
            .collect();
        let matrix = DistanceMatrix::from_rows(rows).expect("square");
        let result = solve(&matrix, 0, false, &budget).expect("not cancelled");
        assert!(result.is_none());
    }
}
