//! Serializable registry configuration.
//!
//! ```rust
//! use quotagate::{RegistryConfig, ResetDelay};
//!
//! let config = RegistryConfig::from_json_str(
//!     r#"{ "reset_delay": "clamp_to_zero", "endpoints": ["CreateChannel", "QueryUsers"] }"#,
//! )
//! .unwrap();
//! assert_eq!(config.reset_delay, ResetDelay::ClampToZero);
//! assert_eq!(config.endpoints.len(), 2);
//! ```

use crate::quota::ResetDelay;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Registry-wide settings and the endpoints to register up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Cooldown policy shared by every barrier the registry creates.
    pub reset_delay: ResetDelay,
    /// Endpoint names registered at construction time.
    pub endpoints: Vec<String>,
}

/// Errors from loading or validating a [`RegistryConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid registry config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("endpoint names must not be empty")]
    EmptyEndpoint,
    #[error("endpoint '{0}' listed more than once")]
    DuplicateEndpoint(String),
}

impl RegistryConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject empty or duplicate endpoint names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for name in &self.endpoints {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyEndpoint);
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateEndpoint(name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = RegistryConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RegistryConfig::default());
        assert_eq!(config.reset_delay, ResetDelay::Magnitude);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = RegistryConfig::from_json_str(r#"{ "endpoint": ["typo"] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn duplicate_endpoints_are_rejected() {
        let err = RegistryConfig::from_json_str(r#"{ "endpoints": ["QueryUsers", "QueryUsers"] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateEndpoint(ref name) if name == "QueryUsers"));
    }

    #[test]
    fn blank_endpoint_is_rejected() {
        let err = RegistryConfig::from_json_str(r#"{ "endpoints": ["  "] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyEndpoint));
    }

    #[test]
    fn round_trips_through_json() {
        let config = RegistryConfig {
            reset_delay: ResetDelay::ClampToZero,
            endpoints: vec!["QueryChannel".into()],
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RegistryConfig::from_json_str(&json).unwrap(), config);
    }
}
