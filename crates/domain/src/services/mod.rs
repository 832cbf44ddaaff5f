//! Domain services - Pure computations over domain entities

pub mod route_solver;

pub use route_solver::{
    DEFAULT_EXACT_NODE_LIMIT, DEFAULT_TIME_BUDGET, MAX_EXACT_NODE_LIMIT, RouteSolver,
    SolverError, SolverOptions,
};
