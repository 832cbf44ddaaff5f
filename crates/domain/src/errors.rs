//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Coordinate outside the valid longitude/latitude range or not parseable
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Unknown travel mode name
    #[error("Unknown travel mode: {0}")]
    UnknownTravelMode(String),

    /// Distance matrix shape or content violates its invariants
    #[error("Invalid distance matrix: {0}")]
    InvalidMatrix(String),

    /// A matrix cell was never filled by the builder
    #[error("Distance matrix is incomplete: cell ({row}, {column}) has no value")]
    IncompleteMatrix { row: usize, column: usize },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_coordinate_error_message() {
        let err = DomainError::InvalidCoordinate("200,10".to_string());
        assert_eq!(err.to_string(), "Invalid coordinate: 200,10");
    }

    #[test]
    fn incomplete_matrix_error_message() {
        let err = DomainError::IncompleteMatrix { row: 2, column: 1 };
        assert_eq!(
            err.to_string(),
            "Distance matrix is incomplete: cell (2, 1) has no value"
        );
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("unknown visit policy".to_string());
        assert_eq!(err.to_string(), "Validation failed: unknown visit policy");
    }

    #[test]
    fn unknown_travel_mode_error_message() {
        let err = DomainError::UnknownTravelMode("teleport".to_string());
        assert_eq!(err.to_string(), "Unknown travel mode: teleport");
    }
}
