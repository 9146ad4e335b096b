//! Push notification configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Expo push configuration. In-app notifications are stored either way.
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Expo enhanced-security access token
    #[serde(default)]
    pub access_token: Option<SecretString>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl PushConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(ValidationError::InvalidPushEndpoint);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            access_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://exp.host/--/api/v2/push/send".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        let config = PushConfig::default();
        assert!(!config.enabled);
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn enabled_requires_http_endpoint() {
        let config = PushConfig {
            enabled: true,
            endpoint: "exp.host/push".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPushEndpoint));
    }

    #[test]
    fn bad_endpoint_is_ignored_while_disabled() {
        let config = PushConfig {
            endpoint: "nonsense".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
