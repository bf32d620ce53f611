//! HTTP server settings.
//!
//! The embedded web server and the function-style endpoint both bind from a
//! [`ServerConfig`]. Values come from `{prefix}HOST`, `{prefix}PORT`,
//! `{prefix}REQUEST_TIMEOUT_SECS` and `{prefix}REQUEST_LOGGING`.

use crate::error::{Result, UtilsError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,

    /// Port to bind to.
    pub port: u16,

    /// Request timeout duration.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Enable request tracing.
    #[serde(default)]
    pub enable_logging: bool,
}

impl ServerConfig {
    /// Create a new server configuration.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: default_timeout(),
            enable_logging: true,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| UtilsError::ServerError(format!("Invalid socket address: {}", e)))
    }

    /// Load configuration from environment variables.
    ///
    /// Defaults to `0.0.0.0:5000`, a 120 second request timeout and request
    /// logging on. Unparseable values are configuration errors rather than a
    /// silent fallback.
    pub fn from_env(prefix: &str) -> Result<Self> {
        let host = crate::config::get_env_or(&format!("{}HOST", prefix), "0.0.0.0");
        let port = parse_env(prefix, "PORT", |raw| raw.parse::<u16>().ok())?.unwrap_or(5000);

        let mut config = Self::new(host, port);
        if let Some(secs) = parse_env(prefix, "REQUEST_TIMEOUT_SECS", |raw| {
            raw.parse::<u64>().ok().filter(|secs| *secs > 0)
        })? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(enabled) = parse_env(prefix, "REQUEST_LOGGING", parse_flag)? {
            config.enable_logging = enabled;
        }

        Ok(config)
    }
}

fn parse_env<T>(prefix: &str, name: &str, parse: impl Fn(&str) -> Option<T>) -> Result<Option<T>> {
    let key = format!("{}{}", prefix, name);
    match crate::config::get_env_opt(&key) {
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| UtilsError::ConfigError(format!("Invalid {} '{}'", key, raw))),
        None => Ok(None),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config() {
        let config = ServerConfig::new("localhost", 3000).with_timeout(Duration::from_secs(60));

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3000);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.enable_logging);
    }

    #[test]
    fn test_socket_addr() {
        let addr = ServerConfig::new("127.0.0.1", 5000).socket_addr().unwrap();
        assert_eq!(addr.port(), 5000);
        assert!(ServerConfig::new("not a host", 1).socket_addr().is_err());
    }

    #[test]
    fn test_from_env_defaults() {
        let config = ServerConfig::from_env("ENTRA_AGENT_TEST_DEFAULTS_").unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.enable_logging);
    }

    #[test]
    fn test_from_env_overrides() {
        std::env::set_var("ENTRA_AGENT_TEST_SRV_HOST", "127.0.0.1");
        std::env::set_var("ENTRA_AGENT_TEST_SRV_PORT", "7071");
        let config = ServerConfig::from_env("ENTRA_AGENT_TEST_SRV_").unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 7071);
        std::env::remove_var("ENTRA_AGENT_TEST_SRV_HOST");
        std::env::remove_var("ENTRA_AGENT_TEST_SRV_PORT");
    }

    #[test]
    fn test_from_env_invalid_port() {
        std::env::set_var("ENTRA_AGENT_TEST_BADSRV_PORT", "http");
        assert!(ServerConfig::from_env("ENTRA_AGENT_TEST_BADSRV_").is_err());
        std::env::remove_var("ENTRA_AGENT_TEST_BADSRV_PORT");
    }

    #[test]
    fn test_from_env_request_settings() {
        std::env::set_var("ENTRA_AGENT_TEST_REQ_REQUEST_TIMEOUT_SECS", "15");
        std::env::set_var("ENTRA_AGENT_TEST_REQ_REQUEST_LOGGING", "off");
        let config = ServerConfig::from_env("ENTRA_AGENT_TEST_REQ_").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(!config.enable_logging);
        std::env::remove_var("ENTRA_AGENT_TEST_REQ_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("ENTRA_AGENT_TEST_REQ_REQUEST_LOGGING");
    }

    #[test]
    fn test_from_env_invalid_request_settings() {
        std::env::set_var("ENTRA_AGENT_TEST_BADREQ_REQUEST_TIMEOUT_SECS", "0");
        assert!(ServerConfig::from_env("ENTRA_AGENT_TEST_BADREQ_").is_err());
        std::env::remove_var("ENTRA_AGENT_TEST_BADREQ_REQUEST_TIMEOUT_SECS");

        std::env::set_var("ENTRA_AGENT_TEST_BADLOG_REQUEST_LOGGING", "maybe");
        assert!(ServerConfig::from_env("ENTRA_AGENT_TEST_BADLOG_").is_err());
        std::env::remove_var("ENTRA_AGENT_TEST_BADLOG_REQUEST_LOGGING");
    }
}
