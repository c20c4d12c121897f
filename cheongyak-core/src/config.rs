//! Centralized configuration for Cheongyak.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::net::SocketAddr;
use std::time::Duration;

use crate::mode::RuntimeMode;
use crate::{CheongyakError, Result};

/// Public data portal endpoint for the 청약홈 APT subscription detail service.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.odcloud.kr/api/ApplyhomeInfoDetailSvc/v1";

/// Central configuration for all Cheongyak components.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct CheongyakConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub runtime_mode: RuntimeMode,
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Resolves host and port into a bindable address.
    ///
    /// # Errors
    ///
    /// - `CheongyakError::Configuration` - If the host is not an IP address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CheongyakError::Configuration {
                reason: format!("Invalid bind address {}:{}: {e}", self.host, self.port),
            })
    }
}

/// Upstream 청약홈 API configuration.
///
/// The request timeout belongs to the provider's HTTP client; the lookup
/// handler itself never adds one.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL the detail operation is appended to
    pub base_url: String,
    /// Public data portal service key (required in production)
    pub service_key: Option<String>,
    /// Total timeout for one upstream request
    pub request_timeout: Duration,
    /// User agent for upstream requests
    pub user_agent: &'static str,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            service_key: None,
            request_timeout: Duration::from_secs(10),
            user_agent: "cheongyak/0.1.0",
        }
    }
}

impl CheongyakConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    ///
    /// Same rules as [`CheongyakConfig::from_env`], without touching the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(host) = lookup("CHEONGYAK_HOST") {
            config.server.host = host;
        }

        if let Some(port) = lookup("CHEONGYAK_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.server.port = port;
            }
        }

        if let Some(base_url) = lookup("CHEONGYAK_API_BASE_URL") {
            config.upstream.base_url = base_url;
        }

        if let Some(key) = lookup("CHEONGYAK_SERVICE_KEY") {
            if !key.is_empty() {
                config.upstream.service_key = Some(key);
            }
        }

        if let Some(timeout) = lookup("CHEONGYAK_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.upstream.request_timeout = Duration::from_secs(seconds);
            }
        }

        if let Some(mode) = lookup("CHEONGYAK_MODE") {
            if let Ok(mode) = mode.parse::<RuntimeMode>() {
                config.runtime_mode = mode;
            }
        }

        config
    }

    /// Creates a configuration for tests: development mode, ephemeral port.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            upstream: UpstreamConfig {
                request_timeout: Duration::from_secs(2),
                ..Default::default()
            },
            runtime_mode: RuntimeMode::Development,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config_values() {
        let config = CheongyakConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert_eq!(config.upstream.request_timeout, Duration::from_secs(10));
        assert!(config.upstream.service_key.is_none());
        assert!(config.runtime_mode.is_development());
    }

    #[test]
    fn test_overrides_apply() {
        let config = CheongyakConfig::from_lookup(lookup_from(&[
            ("CHEONGYAK_HOST", "0.0.0.0"),
            ("CHEONGYAK_PORT", "8080"),
            ("CHEONGYAK_API_BASE_URL", "http://localhost:9999/v1"),
            ("CHEONGYAK_SERVICE_KEY", "secret"),
            ("CHEONGYAK_REQUEST_TIMEOUT", "3"),
            ("CHEONGYAK_MODE", "production"),
        ]));

        assert_eq!(config.server.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.upstream.base_url, "http://localhost:9999/v1");
        assert_eq!(config.upstream.service_key.as_deref(), Some("secret"));
        assert_eq!(config.upstream.request_timeout, Duration::from_secs(3));
        assert!(config.runtime_mode.is_production());
    }

    #[test]
    fn test_invalid_overrides_keep_defaults() {
        let config = CheongyakConfig::from_lookup(lookup_from(&[
            ("CHEONGYAK_PORT", "eighty"),
            ("CHEONGYAK_REQUEST_TIMEOUT", "-1"),
            ("CHEONGYAK_MODE", "staging"),
            ("CHEONGYAK_SERVICE_KEY", ""),
        ]));

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.upstream.request_timeout, Duration::from_secs(10));
        assert!(config.runtime_mode.is_development());
        assert!(config.upstream.service_key.is_none());
    }

    #[test]
    fn test_hostname_is_rejected_as_bind_address() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 3000,
        };
        assert!(matches!(
            server.socket_addr(),
            Err(CheongyakError::Configuration { .. })
        ));
    }
}
