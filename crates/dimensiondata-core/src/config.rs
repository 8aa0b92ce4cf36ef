//! Configuration structures for CaaS connections.
//!
//! [`ConnectionConfig`] can be deserialized from any serde format and is
//! validated before a connection is built from it.

use crate::region::{Region, DEFAULT_REGION};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use validator::Validate;

/// Configuration for a CaaS connection.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct ConnectionConfig {
    /// API user id
    #[validate(length(min = 1))]
    pub user_id: String,

    /// API password
    #[serde(skip_serializing)]
    pub key: String,

    /// Region code (see [`crate::region::REGIONS`])
    #[serde(default = "default_region")]
    pub region: String,

    /// Explicit host, overriding the region host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Explicit port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Use HTTPS
    #[serde(default = "default_secure")]
    pub secure: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional HTTP(S) proxy
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

const fn default_secure() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl ConnectionConfig {
    /// Create a configuration for the default region.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn new(user_id: impl Into<String>, key: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            user_id: user_id.into(),
            key: key.into(),
            region: default_region(),
            host: None,
            port: None,
            secure: default_secure(),
            request_timeout_secs: default_request_timeout_secs(),
            proxy_url: None,
        };

        config.ensure_valid()?;
        Ok(config)
    }

    /// Validate field ranges and formats.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing every failed rule.
    pub fn ensure_valid(&self) -> Result<(), Error> {
        Ok(self.validate()?)
    }

    /// Set the region code.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Override the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Override the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set whether to use HTTPS.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Route requests through a proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve the configured region.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRegion`] for a code missing from the region table.
    pub fn resolve_region(&self) -> Result<&'static Region, Error> {
        Region::lookup(&self.region)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("user_id", &self.user_id)
            .field("key", &"[REDACTED]")
            .field("region", &self.region)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_config_new() {
        let config = ConnectionConfig::new("user", "secret").unwrap();
        assert_eq!(config.user_id, "user");
        assert_eq!(config.region, "dd-na");
        assert!(config.secure);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.host.is_none());
    }

    #[test]
    fn test_connection_config_empty_user() {
        let result = ConnectionConfig::new("", "secret");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_connection_config_builder() {
        let config = ConnectionConfig::new("user", "secret")
            .unwrap()
            .with_region("dd-eu")
            .with_host("caas.internal")
            .with_port(8443)
            .with_secure(false)
            .with_timeout(60)
            .with_proxy("http://proxy.local:3128");

        assert_eq!(config.region, "dd-eu");
        assert_eq!(config.host.as_deref(), Some("caas.internal"));
        assert_eq!(config.port, Some(8443));
        assert!(!config.secure);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_region() {
        let config = ConnectionConfig::new("user", "secret")
            .unwrap()
            .with_region("dd-au");
        assert_eq!(config.resolve_region().unwrap().host, "api-au.dimensiondata.com");

        let config = config.with_region("dd-unknown");
        assert!(matches!(config.resolve_region(), Err(Error::UnknownRegion(_))));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = ConnectionConfig::new("user", "secret").unwrap();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_proxy_url() {
        let config = ConnectionConfig::new("user", "secret")
            .unwrap()
            .with_proxy("not a url");
        assert!(config.validate().is_err());
        match config.ensure_valid() {
            Err(Error::ConfigError(message)) => {
                assert!(message.starts_with("Invalid configuration: "), "{message}");
                assert!(message.contains("proxy_url"), "{message}");
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"user_id": "user", "key": "secret"}"#).unwrap();
        assert_eq!(config.region, "dd-na");
        assert!(config.secure);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.proxy_url.is_none());
    }

    #[test]
    fn test_config_serialization_skips_key() {
        let config = ConnectionConfig::new("user", "secret").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"user_id\":\"user\""));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = ConnectionConfig::new("user", "hunter2").unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
