//! AMap client configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::AmapError;

/// Default AMap REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://restapi.amap.com";

/// Configuration for the AMap web service client
#[derive(Clone, Serialize, Deserialize)]
pub struct AmapConfig {
    /// Base URL of the REST API, without trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Web service key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// City used when a request does not name one (e.g. `"西安"`)
    #[serde(default)]
    pub default_city: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for AmapConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            default_city: None,
        }
    }
}

impl std::fmt::Debug for AmapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmapConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("default_city", &self.default_city)
            .finish()
    }
}

impl AmapConfig {
    /// Configuration pointing at a mock server with a dummy key
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: Some(SecretString::from("test-key")),
            timeout_secs: 5,
            default_city: None,
        }
    }

    /// The API key, if one is configured and non-blank
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|key| !key.trim().is_empty())
    }

    /// The API key or [`AmapError::MissingApiKey`]
    pub fn require_api_key(&self) -> Result<SecretString, AmapError> {
        self.api_key()
            .map(SecretString::from)
            .ok_or(AmapError::MissingApiKey)
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("amap.base_url must not be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "amap.base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }
        if self.timeout_secs == 0 {
            return Err("amap.timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AmapConfig::default();
        assert_eq!(config.base_url, "https://restapi.amap.com");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: AmapConfig =
            serde_json::from_str(r#"{"api_key": "abc123", "default_city": "西安"}"#).unwrap();
        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.default_city.as_deref(), Some("西安"));
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = AmapConfig {
            api_key: Some(SecretString::from("   ")),
            ..AmapConfig::default()
        };
        assert!(config.api_key().is_none());
        assert!(matches!(
            config.require_api_key(),
            Err(AmapError::MissingApiKey)
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AmapConfig::for_testing("http://localhost:1234/");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-key"));
        assert_eq!(config.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_key_is_not_serialized() {
        let json = serde_json::to_string(&AmapConfig::for_testing("http://x")).unwrap();
        assert!(!json.contains("test-key"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AmapConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AmapConfig::default();
        config.base_url = "restapi.amap.com".to_string();
        assert!(config.validate().is_err());
    }
}
