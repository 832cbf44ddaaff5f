//! Application-level errors

use domain::{DomainError, SolverError};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Provider API key is not configured
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Provider refused the configured API key
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A place name could not be resolved to a coordinate
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Provider is down, overloaded or unreachable
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Provider call timed out
    #[error("Provider timeout: {0}")]
    Timeout(String),

    /// Provider refused the request and retrying will not help
    #[error("Provider rejected request: {0}")]
    ProviderRejected(String),

    /// No route exists between two points for the requested mode
    #[error("No route from {from} to {to}")]
    NoRoute { from: String, to: String },

    /// A distance matrix column could not be obtained
    #[error("Failed to build distance matrix at column {column}: {reason}")]
    MatrixBuild { column: usize, reason: String },

    /// The stops cannot be ordered
    #[error("Route is infeasible: {0}")]
    Infeasible(String),

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_) | Self::Timeout(_))
    }

    /// Errors that abort a whole batch instead of dropping one item
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential(_)
                | Self::InvalidCredential(_)
                | Self::Configuration(_)
                | Self::Cancelled
        )
    }

    /// Stable machine-readable code for tool replies
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Domain(_) => "DOMAIN_ERROR",
            Self::MissingCredential(_) => "MISSING_CREDENTIAL",
            Self::InvalidCredential(_) => "INVALID_CREDENTIAL",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::LocationNotFound(_) => "LOCATION_NOT_FOUND",
            Self::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            Self::Timeout(_) => "PROVIDER_TIMEOUT",
            Self::ProviderRejected(_) => "PROVIDER_REJECTED",
            Self::NoRoute { .. } => "NO_ROUTE",
            Self::MatrixBuild { .. } => "MATRIX_BUILD_FAILED",
            Self::Infeasible(_) => "INFEASIBLE",
            Self::Cancelled => "CANCELLED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<SolverError> for ApplicationError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::Cancelled => Self::Cancelled,
            other => Self::Infeasible(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ApplicationError::ProviderUnavailable("503".into()).is_retryable());
        assert!(ApplicationError::Timeout("10s".into()).is_retryable());
    }

    #[test]
    fn definitive_errors_are_not_retryable() {
        assert!(!ApplicationError::LocationNotFound("Atlantis".into()).is_retryable());
        assert!(!ApplicationError::MissingCredential("amap".into()).is_retryable());
        assert!(
            !ApplicationError::NoRoute {
                from: "A".into(),
                to: "B".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn fatal_errors() {
        assert!(ApplicationError::MissingCredential("amap".into()).is_fatal());
        assert!(ApplicationError::InvalidCredential("INVALID_USER_KEY".into()).is_fatal());
        assert!(ApplicationError::Cancelled.is_fatal());
        assert!(!ApplicationError::LocationNotFound("x".into()).is_fatal());
        assert!(!ApplicationError::Timeout("x".into()).is_fatal());
    }

    #[test]
    fn solver_cancel_maps_to_cancelled() {
        assert_eq!(
            ApplicationError::from(SolverError::Cancelled),
            ApplicationError::Cancelled
        );
    }

    #[test]
    fn solver_infeasible_maps_to_infeasible() {
        let err = ApplicationError::from(SolverError::NoFinitePath);
        assert_eq!(err.code(), "INFEASIBLE");
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn error_display() {
        let err = ApplicationError::MatrixBuild {
            column: 2,
            reason: "timeout".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to build distance matrix at column 2: timeout"
        );
        let err = ApplicationError::NoRoute {
            from: "Bell Tower".into(),
            to: "Huashan".into(),
        };
        assert_eq!(err.to_string(), "No route from Bell Tower to Huashan");
    }
}
