//! Domain layer for Routewise
//!
//! Contains the routing vocabulary (coordinates, travel modes, distance
//! matrices, route solutions) and the pure route solver. This layer does no
//! I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use services::{RouteSolver, SolverError, SolverOptions};
pub use value_objects::*;
