//! Error types for the AMap integration

use thiserror::Error;

/// Errors that can occur when talking to AMap
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmapError {
    /// No API key configured
    #[error("AMap API key is not configured")]
    MissingApiKey,

    /// Failed to reach the service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// HTTP-level failure that is not worth retrying
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Provider-side engine or server error
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Too many requests per second
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Daily or per-IP quota used up
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Key rejected or lacking permission for the endpoint
    #[error("Invalid API key: {0}")]
    InvalidKey(String),

    /// Malformed or missing request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response body could not be decoded
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The query matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// No route exists for the requested mode
    #[error("No route found: {0}")]
    NoRoute(String),

    /// Any other provider status
    #[error("AMap error {infocode}: {info}")]
    Api { infocode: String, info: String },
}

impl AmapError {
    /// Check if the error is transient and worth retrying
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::Timeout { .. }
                | Self::ServiceUnavailable(_)
                | Self::RateLimitExceeded(_)
        )
    }

    /// Classify a provider `infocode`/`info` pair
    ///
    /// v3 endpoints report the code as a string, v4 as an integer `errcode`;
    /// both share the same numbering.
    #[must_use]
    pub fn from_infocode(infocode: &str, info: &str) -> Self {
        let info = info.to_string();
        let Ok(code) = infocode.trim().parse::<u32>() else {
            return Self::Api {
                infocode: infocode.to_string(),
                info,
            };
        };

        match code {
            10001 | 10002 | 10005..=10009 | 10012 => Self::InvalidKey(info),
            10004 | 10014..=10016 | 10019..=10021 => Self::RateLimitExceeded(info),
            10003 | 10010 | 10044 | 10045 => Self::QuotaExceeded(info),
            20000..=20002 | 20011 | 20012 => Self::InvalidRequest(info),
            20800..=20803 => Self::NoRoute(info),
            30000..=39999 => Self::ServiceUnavailable(info),
            _ => Self::Api {
                infocode: code.to_string(),
                info,
            },
        }
    }
}
