//! Construction heuristic plus local search
//!
//! Starting orders are improved independently: the nearest-neighbour tour
//! from the depot and the input order. Keeping the input order as a
//! candidate means the result is never worse than visiting the points as
//! given. When neither uses only finite arcs, a depth-first walk along
//! finite arcs is added as a third start. Improvement alternates 2-opt and
//! Or-opt passes until neither finds a better order or the budget runs out.
//!
//! Orders are compared by [`TourCost`]: fewer unreachable arcs first, then
//! the finite sum. Costs are re-evaluated over the whole order on every move
//! because the matrix may be asymmetric: reversing a segment changes the
//! cost of every arc inside it.

use super::{Budget, SolverError};
use crate::entities::{DistanceMatrix, UNREACHABLE};

/// Expansions allowed for the finite-arc walk
const WALK_STEP_LIMIT: usize = 50_000;

pub(super) struct LocalSearchOutcome {
    pub order: Vec<usize>,
    pub budget_exhausted: bool,
}

/// Cost of an order that still ranks infeasible orders against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TourCost {
    /// Arcs with no finite cost
    broken: usize,
    /// Sum over the finite arcs
    finite: u64,
}

impl TourCost {
    fn of(matrix: &DistanceMatrix, order: &[usize], closed_loop: bool) -> Self {
        let closing = if closed_loop && order.len() > 1 {
            order.last().copied().zip(order.first().copied())
        } else {
            None
        };

        let mut cost = Self {
            broken: 0,
            finite: 0,
        };
        for (from, to) in order.windows(2).map(|pair| (pair[0], pair[1])).chain(closing) {
            match matrix.cost(from, to) {
                UNREACHABLE => cost.broken += 1,
                arc => cost.finite = cost.finite.saturating_add(arc),
            }
        }
        cost
    }

    const fn is_feasible(self) -> bool {
        self.broken == 0
    }
}

pub(super) fn solve(
    matrix: &DistanceMatrix,
    depot: usize,
    closed_loop: bool,
    budget: &Budget<'_>,
) -> Result<LocalSearchOutcome, SolverError> {
    let mut input_order = Vec::with_capacity(matrix.size());
    input_order.push(depot);
    input_order.extend((0..matrix.size()).filter(|&i| i != depot));

    let mut candidates = vec![nearest_neighbor(matrix, depot), input_order];
    if !candidates
        .iter()
        .any(|order| TourCost::of(matrix, order, closed_loop).is_feasible())
    {
        if let Some(walk) = finite_walk(matrix, depot, closed_loop, budget)? {
            candidates.push(walk);
        }
    }

    let mut best: Option<(Vec<usize>, TourCost)> = None;
    let mut budget_exhausted = false;
    for mut order in candidates {
        if !budget_exhausted {
            budget_exhausted = improve(matrix, &mut order, closed_loop, budget)?;
        }
        let cost = TourCost::of(matrix, &order, closed_loop);
        if best.as_ref().is_none_or(|(_, best_cost)| cost < *best_cost) {
            best = Some((order, cost));
        }
    }

    let order = best.map(|(order, _)| order).unwrap_or_default();
    Ok(LocalSearchOutcome {
        order,
        budget_exhausted,
    })
}

/// Greedy tour: always move to the cheapest unvisited point
///
/// Ties go to the lowest index. Points unreachable from the current end are
/// still appended so the result is always a full permutation.
fn nearest_neighbor(matrix: &DistanceMatrix, depot: usize) -> Vec<usize> {
    let n = matrix.size();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut current = depot;
    visited[current] = true;
    order.push(current);

    for _ in 1..n {
        let mut next: Option<(usize, u64)> = None;
        for (j, seen) in visited.iter().enumerate() {
            if *seen {
                continue;
            }
            let cost = matrix.cost(current, j);
            if next.is_none_or(|(_, best)| cost < best) {
                next = Some((j, cost));
            }
        }
        let Some((j, _)) = next else { break };
        visited[j] = true;
        order.push(j);
        current = j;
    }

    order
}

/// Depth-first search for an order that uses finite arcs only
///
/// At each step the point with the fewest finite onward arcs is tried
/// first, then the cheaper arc. Gives up after [`WALK_STEP_LIMIT`]
/// expansions or when the budget runs out.
fn finite_walk(
    matrix: &DistanceMatrix,
    depot: usize,
    closed_loop: bool,
    budget: &Budget<'_>,
) -> Result<Option<Vec<usize>>, SolverError> {
    let n = matrix.size();
    let mut visited = vec![false; n];
    visited[depot] = true;
    let mut order = vec![depot];
    // Untried successors per depth, most promising last
    let mut frontier = vec![successors(matrix, depot, &visited)];
    let mut steps = 0usize;

    while let Some(options) = frontier.last_mut() {
        if order.len() == n {
            let closes = order
                .last()
                .is_some_and(|&last| !closed_loop || matrix.cost(last, depot) != UNREACHABLE);
            if closes {
                return Ok(Some(order));
            }
        }

        if let Some(next) = options.pop() {
            steps += 1;
            if steps > WALK_STEP_LIMIT || budget.exhausted()? {
                return Ok(None);
            }
            visited[next] = true;
            order.push(next);
            frontier.push(successors(matrix, next, &visited));
        } else {
            frontier.pop();
            if let Some(last) = order.pop() {
                visited[last] = false;
            }
        }
    }
    Ok(None)
}

/// Unvisited points reachable from `from`, ordered so the best one is last
fn successors(matrix: &DistanceMatrix, from: usize, visited: &[bool]) -> Vec<usize> {
    let n = matrix.size();
    let finite = |a: usize, b: usize| matrix.cost(a, b) != UNREACHABLE;
    let onward =
        |j: usize| (0..n).filter(|&k| k != j && !visited[k] && finite(j, k)).count();

    let mut next: Vec<(usize, u64, usize)> = (0..n)
        .filter(|&j| !visited[j] && finite(from, j))
        .map(|j| (onward(j), matrix.cost(from, j), j))
        .collect();
    next.sort_unstable_by(|a, b| b.cmp(a));
    next.into_iter().map(|(_, _, j)| j).collect()
}

/// Run improvement passes in place; returns whether the budget ran out
fn improve(
    matrix: &DistanceMatrix,
    order: &mut Vec<usize>,
    closed_loop: bool,
    budget: &Budget<'_>,
) -> Result<bool, SolverError> {
    let mut cost = TourCost::of(matrix, order, closed_loop);
    loop {
        if budget.exhausted()? {
            return Ok(true);
        }
        let (two_opt_cost, out_of_time) = two_opt_pass(matrix, order, cost, closed_loop, budget)?;
        if out_of_time {
            return Ok(true);
        }
        let (or_opt_cost, out_of_time) =
            or_opt_pass(matrix, order, two_opt_cost, closed_loop, budget)?;
        if out_of_time {
            return Ok(true);
        }
        if or_opt_cost >= cost {
            return Ok(false);
        }
        cost = or_opt_cost;
    }
}

/// One sweep of segment reversals, keeping every improving move
///
/// ```text
///  before:  depot -> a -> [b -> c -> d] -> e
///  after:   depot -> a -> [d -> c -> b] -> e
/// ```
///
/// Position 0 holds the depot and never moves.
fn two_opt_pass(
    matrix: &DistanceMatrix,
    order: &mut [usize],
    mut cost: TourCost,
    closed_loop: bool,
    budget: &Budget<'_>,
) -> Result<(TourCost, bool), SolverError> {
    let n = order.len();
    for i in 1..n.saturating_sub(1) {
        if budget.exhausted()? {
            return Ok((cost, true));
        }
        for j in i + 1..n {
            order[i..=j].reverse();
            let candidate = TourCost::of(matrix, order, closed_loop);
            if candidate < cost {
                cost = candidate;
            } else {
                order[i..=j].reverse();
            }
        }
    }
    Ok((cost, false))
}

/// One sweep of single-point relocations, keeping every improving move
fn or_opt_pass(
    matrix: &DistanceMatrix,
    order: &mut Vec<usize>,
    mut cost: TourCost,
    closed_loop: bool,
    budget: &Budget<'_>,
) -> Result<(TourCost, bool), SolverError> {
    let n = order.len();
    for from in 1..n {
        if budget.exhausted()? {
            return Ok((cost, true));
        }
        for to in 1..n {
            if to == from {
                continue;
            }
            let node = order.remove(from);
            order.insert(to, node);
            let candidate = TourCost::of(matrix, order, closed_loop);
            if candidate < cost {
                cost = candidate;
            } else {
                let node = order.remove(to);
                order.insert(from, node);
            }
        }
    }
    Ok((cost, false))
}
